//! Per-player stat lines (batting, pitching, fielding), one row per
//! (player, tournament). Writes are upserts: the posted counters replace
//! whatever totals were stored before.

use std::collections::BTreeMap;

use chrono::Utc;
use liga_core::types::{DefensiveLine, OffensiveLine, PitchingLine, StatKind};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{Result, StoreError};
use crate::types::{PlayerStats, StatRecord};

/// Maps a stat line type onto its table.
///
/// Column names double as the serde field names of the line, so the same
/// list drives the upsert, the select and the JSON shape.
pub trait StatLine: Sized + Serialize {
    const KIND: StatKind;
    const COLUMNS: &'static [&'static str];

    /// Read the line from `row`, starting at column index `offset`.
    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self>;

    /// Values in `COLUMNS` order.
    fn values(&self) -> Vec<Value>;

    fn rates(&self) -> BTreeMap<&'static str, f64>;
}

impl StatLine for OffensiveLine {
    const KIND: StatKind = StatKind::Offensive;
    const COLUMNS: &'static [&'static str] = &[
        "plate_appearances",
        "at_bats",
        "hits",
        "doubles",
        "triples",
        "home_runs",
        "rbi",
        "runs",
        "walks",
        "strikeouts",
        "stolen_bases",
        "hit_by_pitch",
        "sacrifice_flies",
    ];

    fn from_row(row: &Row<'_>, o: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            plate_appearances: row.get(o)?,
            at_bats: row.get(o + 1)?,
            hits: row.get(o + 2)?,
            doubles: row.get(o + 3)?,
            triples: row.get(o + 4)?,
            home_runs: row.get(o + 5)?,
            rbi: row.get(o + 6)?,
            runs: row.get(o + 7)?,
            walks: row.get(o + 8)?,
            strikeouts: row.get(o + 9)?,
            stolen_bases: row.get(o + 10)?,
            hit_by_pitch: row.get(o + 11)?,
            sacrifice_flies: row.get(o + 12)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        [
            self.plate_appearances,
            self.at_bats,
            self.hits,
            self.doubles,
            self.triples,
            self.home_runs,
            self.rbi,
            self.runs,
            self.walks,
            self.strikeouts,
            self.stolen_bases,
            self.hit_by_pitch,
            self.sacrifice_flies,
        ]
        .into_iter()
        .map(Value::Integer)
        .collect()
    }

    fn rates(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("avg", self.avg()),
            ("obp", self.obp()),
            ("slg", self.slg()),
            ("ops", self.ops()),
        ])
    }
}

impl StatLine for PitchingLine {
    const KIND: StatKind = StatKind::Pitching;
    const COLUMNS: &'static [&'static str] = &[
        "innings_pitched",
        "hits_allowed",
        "runs_allowed",
        "earned_runs",
        "walks_allowed",
        "strikeouts",
        "wins",
        "losses",
        "saves",
    ];

    fn from_row(row: &Row<'_>, o: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            innings_pitched: row.get(o)?,
            hits_allowed: row.get(o + 1)?,
            runs_allowed: row.get(o + 2)?,
            earned_runs: row.get(o + 3)?,
            walks_allowed: row.get(o + 4)?,
            strikeouts: row.get(o + 5)?,
            wins: row.get(o + 6)?,
            losses: row.get(o + 7)?,
            saves: row.get(o + 8)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        let mut values = vec![Value::Real(self.innings_pitched)];
        values.extend(
            [
                self.hits_allowed,
                self.runs_allowed,
                self.earned_runs,
                self.walks_allowed,
                self.strikeouts,
                self.wins,
                self.losses,
                self.saves,
            ]
            .into_iter()
            .map(Value::Integer),
        );
        values
    }

    fn rates(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([("era", self.era()), ("whip", self.whip())])
    }
}

impl StatLine for DefensiveLine {
    const KIND: StatKind = StatKind::Defensive;
    const COLUMNS: &'static [&'static str] = &["putouts", "assists", "errors", "double_plays"];

    fn from_row(row: &Row<'_>, o: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            putouts: row.get(o)?,
            assists: row.get(o + 1)?,
            errors: row.get(o + 2)?,
            double_plays: row.get(o + 3)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        [self.putouts, self.assists, self.errors, self.double_plays]
            .into_iter()
            .map(Value::Integer)
            .collect()
    }

    fn rates(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([("fielding_pct", self.fielding_pct())])
    }
}

/// Insert or replace the totals for (`player_id`, `tournament_id`).
#[instrument(skip(conn, line), fields(kind = %L::KIND))]
pub fn upsert<L: StatLine>(
    conn: &Connection,
    player_id: i64,
    tournament_id: i64,
    line: &L,
) -> Result<StatRecord<L>> {
    crate::players::get(conn, player_id)?;
    crate::tournaments::get(conn, tournament_id)?;

    let cols = L::COLUMNS.join(", ");
    let placeholders = (3..3 + L::COLUMNS.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let updated_at = 3 + L::COLUMNS.len();
    let assignments = L::COLUMNS
        .iter()
        .map(|c| format!("{c} = excluded.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {table} (jugador_id, torneo_id, {cols}, updated_at)
         VALUES (?1, ?2, {placeholders}, ?{updated_at})
         ON CONFLICT (jugador_id, torneo_id)
         DO UPDATE SET {assignments}, updated_at = excluded.updated_at",
        table = L::KIND.table(),
    );

    let mut params = vec![Value::Integer(player_id), Value::Integer(tournament_id)];
    params.extend(line.values());
    params.push(Value::Text(Utc::now().to_rfc3339()));
    conn.execute(&sql, rusqlite::params_from_iter(params))?;

    info!(player_id, tournament_id, "stat line upserted");
    get::<L>(conn, player_id, tournament_id)?
        .ok_or(StoreError::not_found("stat line", player_id))
}

pub fn get<L: StatLine>(
    conn: &Connection,
    player_id: i64,
    tournament_id: i64,
) -> Result<Option<StatRecord<L>>> {
    let sql = format!("{} WHERE s.jugador_id = ?1 AND s.torneo_id = ?2", select_sql::<L>());
    Ok(conn
        .query_row(&sql, [player_id, tournament_id], row_to_record::<L>)
        .optional()?)
}

/// All lines of one kind in a tournament, optionally for a single player.
pub fn list<L: StatLine>(
    conn: &Connection,
    tournament_id: i64,
    player_id: Option<i64>,
) -> Result<Vec<StatRecord<L>>> {
    let sql = format!(
        "{} WHERE s.torneo_id = ?1 AND (?2 IS NULL OR s.jugador_id = ?2) ORDER BY j.name",
        select_sql::<L>()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params![tournament_id, player_id], row_to_record::<L>)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn delete(conn: &Connection, kind: StatKind, player_id: i64, tournament_id: i64) -> Result<()> {
    let sql = format!(
        "DELETE FROM {} WHERE jugador_id = ?1 AND torneo_id = ?2",
        kind.table()
    );
    let n = conn.execute(&sql, [player_id, tournament_id])?;
    if n == 0 {
        return Err(StoreError::not_found("stat line", player_id));
    }
    info!(player_id, tournament_id, %kind, "stat line deleted");
    Ok(())
}

/// Every line recorded for a player in `tournament_id` (`None` when the
/// league has no tournaments yet, which yields empty lines).
pub fn player_summary(
    conn: &Connection,
    player_id: i64,
    tournament_id: Option<i64>,
) -> Result<PlayerStats> {
    let player = crate::players::get(conn, player_id)?;
    let (ofensivas, pitcheo, defensivas) = match tournament_id {
        Some(t) => (
            get::<OffensiveLine>(conn, player_id, t)?,
            get::<PitchingLine>(conn, player_id, t)?,
            get::<DefensiveLine>(conn, player_id, t)?,
        ),
        None => (None, None, None),
    };
    Ok(PlayerStats {
        player,
        tournament_id,
        ofensivas,
        pitcheo,
        defensivas,
    })
}

fn select_sql<L: StatLine>() -> String {
    let cols = L::COLUMNS
        .iter()
        .map(|c| format!("s.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT s.jugador_id, j.name, j.equipo_id, s.torneo_id, s.updated_at, {cols}
         FROM {table} s JOIN jugadores j ON j.id = s.jugador_id",
        table = L::KIND.table()
    )
}

fn row_to_record<L: StatLine>(row: &Row<'_>) -> rusqlite::Result<StatRecord<L>> {
    let line = L::from_row(row, 5)?;
    Ok(StatRecord {
        player_id: row.get(0)?,
        player_name: row.get(1)?,
        team_id: row.get(2)?,
        tournament_id: row.get(3)?,
        updated_at: row.get(4)?,
        rates: line.rates(),
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn upsert_replaces_totals() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let a = team(&conn, "Aguilas");
        let p = player(&conn, a, "Luis");

        let first = OffensiveLine {
            at_bats: 4,
            hits: 1,
            ..Default::default()
        };
        upsert(&conn, p, t, &first).unwrap();
        let second = OffensiveLine {
            at_bats: 8,
            hits: 4,
            home_runs: 1,
            ..Default::default()
        };
        let rec = upsert(&conn, p, t, &second).unwrap();
        assert_eq!(rec.line, second);
        assert_eq!(rec.player_name, "Luis");
        assert_eq!(rec.rates["avg"], 0.5);
        assert_eq!(list::<OffensiveLine>(&conn, t, None).unwrap().len(), 1);
    }

    #[test]
    fn upsert_checks_player_and_tournament() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let err = upsert(&conn, 5, t, &DefensiveLine::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "player", .. }));

        let p = player(&conn, team(&conn, "A"), "Ana");
        let err = upsert(&conn, p, 40, &DefensiveLine::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "tournament", .. }));
    }

    #[test]
    fn pitching_round_trips_innings() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let p = player(&conn, team(&conn, "A"), "Ana");
        let line = PitchingLine {
            innings_pitched: 6.667,
            earned_runs: 2,
            runs_allowed: 3,
            ..Default::default()
        };
        let rec = upsert(&conn, p, t, &line).unwrap();
        assert_eq!(rec.line.innings_pitched, 6.667);
        assert_eq!(rec.rates["era"], 2.7);
    }

    #[test]
    fn lines_are_scoped_per_tournament() {
        let conn = league();
        let t1 = tournament(&conn, "2025");
        let t2 = tournament(&conn, "2026");
        let p = player(&conn, team(&conn, "A"), "Ana");
        upsert(&conn, p, t1, &DefensiveLine { putouts: 3, ..Default::default() }).unwrap();
        upsert(&conn, p, t2, &DefensiveLine { putouts: 9, ..Default::default() }).unwrap();

        let summary = player_summary(&conn, p, Some(t2)).unwrap();
        assert_eq!(summary.defensivas.unwrap().line.putouts, 9);
        assert!(summary.ofensivas.is_none());

        delete(&conn, StatKind::Defensive, p, t1).unwrap();
        assert!(get::<DefensiveLine>(&conn, p, t1).unwrap().is_none());
        assert!(matches!(
            delete(&conn, StatKind::Defensive, p, t1),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn deleting_player_drops_lines() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let p = player(&conn, team(&conn, "A"), "Ana");
        upsert(&conn, p, t, &OffensiveLine::default()).unwrap();
        crate::players::delete(&conn, p).unwrap();
        assert!(list::<OffensiveLine>(&conn, t, None).unwrap().is_empty());
    }

    #[test]
    fn record_serializes_flat() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let p = player(&conn, team(&conn, "A"), "Ana");
        let rec = upsert(&conn, p, t, &DefensiveLine { assists: 2, ..Default::default() }).unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["jugador_id"], p);
        assert_eq!(json["assists"], 2);
        assert_eq!(json["rates"]["fielding_pct"], 1.0);
    }
}
