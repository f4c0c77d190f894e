use std::borrow::Cow;
use std::str::FromStr;

use liga_core::config::LeadersConfig;
use liga_core::types::{round2, round3, StatKind};
use rusqlite::types::Value;
use rusqlite::Connection;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::types::LeaderRow;

// Rate expressions over the stat table aliased `s`. Empty denominators yield 0.
const AVG_EXPR: &str =
    "(CASE WHEN s.at_bats > 0 THEN CAST(s.hits AS REAL) / s.at_bats ELSE 0.0 END)";
const OBP_EXPR: &str = "(CASE WHEN s.at_bats + s.walks + s.hit_by_pitch + s.sacrifice_flies > 0
     THEN CAST(s.hits + s.walks + s.hit_by_pitch AS REAL)
          / (s.at_bats + s.walks + s.hit_by_pitch + s.sacrifice_flies)
     ELSE 0.0 END)";
// Total bases = H + 2B + 2*3B + 3*HR.
const SLG_EXPR: &str = "(CASE WHEN s.at_bats > 0
     THEN CAST(s.hits + s.doubles + 2 * s.triples + 3 * s.home_runs AS REAL) / s.at_bats
     ELSE 0.0 END)";
const ERA_EXPR: &str =
    "(CASE WHEN s.innings_pitched > 0 THEN 9.0 * s.earned_runs / s.innings_pitched ELSE 0.0 END)";
const WHIP_EXPR: &str = "(CASE WHEN s.innings_pitched > 0
     THEN CAST(s.walks_allowed + s.hits_allowed AS REAL) / s.innings_pitched
     ELSE 0.0 END)";
const FPCT_EXPR: &str = "(CASE WHEN s.putouts + s.assists + s.errors > 0
     THEN CAST(s.putouts + s.assists AS REAL) / (s.putouts + s.assists + s.errors)
     ELSE 0.0 END)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderCategory {
    Avg,
    Obp,
    Slg,
    Ops,
    Hits,
    HomeRuns,
    Rbi,
    Runs,
    StolenBases,
    Era,
    Whip,
    Strikeouts,
    Wins,
    Saves,
    Fielding,
}

/// Which minimum a rate category is gated on.
enum Qualifier {
    AtBats,
    Innings,
    Chances,
    /// Counting stats: list anyone with a non-zero total.
    NonZero,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 15] = [
        LeaderCategory::Avg,
        LeaderCategory::Obp,
        LeaderCategory::Slg,
        LeaderCategory::Ops,
        LeaderCategory::Hits,
        LeaderCategory::HomeRuns,
        LeaderCategory::Rbi,
        LeaderCategory::Runs,
        LeaderCategory::StolenBases,
        LeaderCategory::Era,
        LeaderCategory::Whip,
        LeaderCategory::Strikeouts,
        LeaderCategory::Wins,
        LeaderCategory::Saves,
        LeaderCategory::Fielding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderCategory::Avg => "avg",
            LeaderCategory::Obp => "obp",
            LeaderCategory::Slg => "slg",
            LeaderCategory::Ops => "ops",
            LeaderCategory::Hits => "hits",
            LeaderCategory::HomeRuns => "home_runs",
            LeaderCategory::Rbi => "rbi",
            LeaderCategory::Runs => "runs",
            LeaderCategory::StolenBases => "stolen_bases",
            LeaderCategory::Era => "era",
            LeaderCategory::Whip => "whip",
            LeaderCategory::Strikeouts => "strikeouts",
            LeaderCategory::Wins => "wins",
            LeaderCategory::Saves => "saves",
            LeaderCategory::Fielding => "fielding",
        }
    }

    fn kind(&self) -> StatKind {
        use LeaderCategory::*;
        match self {
            Avg | Obp | Slg | Ops | Hits | HomeRuns | Rbi | Runs | StolenBases => {
                StatKind::Offensive
            }
            Era | Whip | Strikeouts | Wins | Saves => StatKind::Pitching,
            Fielding => StatKind::Defensive,
        }
    }

    /// SQL expression for the ranked value, over the stat table aliased `s`.
    fn expr(&self) -> Cow<'static, str> {
        let sql = match self {
            LeaderCategory::Avg => AVG_EXPR,
            LeaderCategory::Obp => OBP_EXPR,
            LeaderCategory::Slg => SLG_EXPR,
            LeaderCategory::Ops => return Cow::Owned(format!("({OBP_EXPR} + {SLG_EXPR})")),
            LeaderCategory::Hits => "s.hits",
            LeaderCategory::HomeRuns => "s.home_runs",
            LeaderCategory::Rbi => "s.rbi",
            LeaderCategory::Runs => "s.runs",
            LeaderCategory::StolenBases => "s.stolen_bases",
            LeaderCategory::Era => ERA_EXPR,
            LeaderCategory::Whip => WHIP_EXPR,
            LeaderCategory::Strikeouts => "s.strikeouts",
            LeaderCategory::Wins => "s.wins",
            LeaderCategory::Saves => "s.saves",
            LeaderCategory::Fielding => FPCT_EXPR,
        };
        Cow::Borrowed(sql)
    }

    fn qualifier(&self) -> Qualifier {
        use LeaderCategory::*;
        match self {
            Avg | Obp | Slg | Ops => Qualifier::AtBats,
            Era | Whip => Qualifier::Innings,
            Fielding => Qualifier::Chances,
            _ => Qualifier::NonZero,
        }
    }

    /// Lower is better for run prevention rates.
    pub fn ascending(&self) -> bool {
        matches!(self, LeaderCategory::Era | LeaderCategory::Whip)
    }

    fn round(&self, v: f64) -> f64 {
        match self {
            LeaderCategory::Era | LeaderCategory::Whip => round2(v),
            _ => round3(v),
        }
    }
}

impl FromStr for LeaderCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LeaderCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown leaderboard category '{s}'"))
    }
}

/// Top `limit` players of a tournament in `category`.
///
/// Rate categories only rank players that reach the configured minimum
/// (at-bats, innings or chances). Equal values are ordered by player name.
#[instrument(skip(conn, thresholds), fields(category = category.as_str()))]
pub fn compute(
    conn: &Connection,
    category: LeaderCategory,
    tournament_id: i64,
    limit: usize,
    thresholds: &LeadersConfig,
) -> Result<Vec<LeaderRow>> {
    let expr = category.expr();
    let (gate, min) = match category.qualifier() {
        Qualifier::AtBats => ("s.at_bats >= ?3".to_string(), Value::Integer(thresholds.min_at_bats)),
        Qualifier::Innings => (
            "s.innings_pitched >= ?3".to_string(),
            Value::Real(thresholds.min_innings),
        ),
        Qualifier::Chances => (
            "s.putouts + s.assists + s.errors >= ?3".to_string(),
            Value::Integer(thresholds.min_chances),
        ),
        Qualifier::NonZero => (format!("{expr} > ?3"), Value::Integer(0)),
    };
    let order = if category.ascending() { "ASC" } else { "DESC" };
    let sql = format!(
        "SELECT j.id, j.name, e.id, e.name, {expr} AS value
         FROM {table} s
         JOIN jugadores j ON j.id = s.jugador_id
         JOIN equipos e ON e.id = j.equipo_id
         WHERE s.torneo_id = ?1 AND {gate}
         ORDER BY value {order}, j.name ASC
         LIMIT ?2",
        table = category.kind().table(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params![tournament_id, limit as i64, min],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
            ))
        },
    )?;

    let mut leaders = Vec::new();
    for (i, row) in rows.enumerate() {
        let (player_id, player_name, team_id, team_name, value) = row?;
        leaders.push(LeaderRow {
            rank: i + 1,
            player_id,
            player_name,
            team_id,
            team_name,
            value: category.round(value),
        });
    }
    Ok(leaders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;
    use crate::test_support::*;
    use liga_core::types::{DefensiveLine, OffensiveLine, PitchingLine};

    fn batting(at_bats: i64, hits: i64, home_runs: i64) -> OffensiveLine {
        OffensiveLine {
            at_bats,
            hits,
            home_runs,
            ..Default::default()
        }
    }

    #[test]
    fn category_names_round_trip() {
        for c in LeaderCategory::ALL {
            assert_eq!(c.as_str().parse::<LeaderCategory>().unwrap(), c);
        }
        assert!("batting".parse::<LeaderCategory>().is_err());
    }

    #[test]
    fn average_requires_minimum_at_bats() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let a = team(&conn, "Aguilas");
        let luis = player(&conn, a, "Luis");
        let ana = player(&conn, a, "Ana");
        let beto = player(&conn, a, "Beto");
        stats::upsert(&conn, luis, t, &batting(20, 8, 0)).unwrap();
        stats::upsert(&conn, ana, t, &batting(30, 9, 2)).unwrap();
        // 1.000 in two at-bats must not lead the board.
        stats::upsert(&conn, beto, t, &batting(2, 2, 0)).unwrap();

        let rows = compute(&conn, LeaderCategory::Avg, t, 10, &LeadersConfig::default()).unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.player_id).collect();
        assert_eq!(ids, vec![luis, ana]);
        assert_eq!(rows[0].value, 0.4);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].value, 0.3);
    }

    #[test]
    fn counting_stats_skip_zero_and_honor_limit() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let a = team(&conn, "A");
        let p1 = player(&conn, a, "Uno");
        let p2 = player(&conn, a, "Dos");
        let p3 = player(&conn, a, "Tres");
        stats::upsert(&conn, p1, t, &batting(10, 3, 1)).unwrap();
        stats::upsert(&conn, p2, t, &batting(10, 5, 3)).unwrap();
        stats::upsert(&conn, p3, t, &batting(10, 2, 0)).unwrap();

        let rows =
            compute(&conn, LeaderCategory::HomeRuns, t, 10, &LeadersConfig::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].player_id, p2);
        assert_eq!(rows[0].value, 3.0);

        let top = compute(&conn, LeaderCategory::HomeRuns, t, 1, &LeadersConfig::default()).unwrap();
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn era_sorts_ascending() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let a = team(&conn, "A");
        let ace = player(&conn, a, "Ace");
        let mop = player(&conn, a, "Mop");
        let pitch = |ip: f64, er: i64| PitchingLine {
            innings_pitched: ip,
            earned_runs: er,
            runs_allowed: er,
            ..Default::default()
        };
        stats::upsert(&conn, ace, t, &pitch(18.0, 2)).unwrap();
        stats::upsert(&conn, mop, t, &pitch(9.0, 6)).unwrap();

        let rows = compute(&conn, LeaderCategory::Era, t, 10, &LeadersConfig::default()).unwrap();
        assert_eq!(rows[0].player_id, ace);
        assert_eq!(rows[0].value, 1.0);
        assert_eq!(rows[1].value, 6.0);
    }

    #[test]
    fn fielding_uses_chances_threshold() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let a = team(&conn, "A");
        let p1 = player(&conn, a, "Guante");
        let p2 = player(&conn, a, "Manos");
        stats::upsert(
            &conn,
            p1,
            t,
            &DefensiveLine {
                putouts: 8,
                assists: 1,
                errors: 1,
                ..Default::default()
            },
        )
        .unwrap();
        stats::upsert(
            &conn,
            p2,
            t,
            &DefensiveLine {
                putouts: 2,
                ..Default::default()
            },
        )
        .unwrap();
        let rows =
            compute(&conn, LeaderCategory::Fielding, t, 10, &LeadersConfig::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 0.9);
    }
}
