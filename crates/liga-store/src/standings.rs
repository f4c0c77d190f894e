use liga_core::types::{ratio, round3};
use rusqlite::Connection;
use tracing::instrument;

use crate::error::Result;
use crate::types::StandingRow;

/// Standings for a tournament, built from finished games only.
///
/// Every team with at least one game (of any status) in the tournament is
/// listed. Ties count as half a win in `win_pct`. Ordering: `win_pct` desc,
/// `run_diff` desc, then team name.
#[instrument(skip(conn))]
pub fn compute(conn: &Connection, tournament_id: i64) -> Result<Vec<StandingRow>> {
    let mut stmt = conn.prepare(
        "WITH participants AS (
             SELECT equipo_local_id AS team FROM partidos WHERE torneo_id = ?1
             UNION
             SELECT equipo_visitante_id FROM partidos WHERE torneo_id = ?1
         ),
         results AS (
             SELECT equipo_local_id AS team, home_runs AS rf, away_runs AS ra
             FROM partidos WHERE torneo_id = ?1 AND status = 'finalizado'
             UNION ALL
             SELECT equipo_visitante_id, away_runs, home_runs
             FROM partidos WHERE torneo_id = ?1 AND status = 'finalizado'
         )
         SELECT e.id, e.name,
                COUNT(r.team),
                COALESCE(SUM(r.rf > r.ra), 0),
                COALESCE(SUM(r.rf < r.ra), 0),
                COALESCE(SUM(r.rf = r.ra), 0),
                COALESCE(SUM(r.rf), 0),
                COALESCE(SUM(r.ra), 0)
         FROM participants p
         JOIN equipos e ON e.id = p.team
         LEFT JOIN results r ON r.team = p.team
         GROUP BY e.id, e.name",
    )?;

    let mut rows: Vec<StandingRow> = stmt
        .query_map([tournament_id], |row| {
            let played: i64 = row.get(2)?;
            let wins: i64 = row.get(3)?;
            let ties: i64 = row.get(5)?;
            let runs_for: i64 = row.get(6)?;
            let runs_against: i64 = row.get(7)?;
            Ok(StandingRow {
                team_id: row.get(0)?,
                team_name: row.get(1)?,
                played,
                wins,
                losses: row.get(4)?,
                ties,
                runs_for,
                runs_against,
                run_diff: runs_for - runs_against,
                win_pct: round3(ratio(wins as f64 + 0.5 * ties as f64, played as f64)),
                games_behind: 0.0,
            })
        })?
        .collect::<rusqlite::Result<_>>()?;

    rows.sort_by(|a, b| {
        b.win_pct
            .total_cmp(&a.win_pct)
            .then(b.run_diff.cmp(&a.run_diff))
            .then_with(|| a.team_name.cmp(&b.team_name))
    });

    if let Some((lead_w, lead_l)) = rows.first().map(|r| (r.wins, r.losses)) {
        for row in &mut rows {
            row.games_behind = ((lead_w - row.wins) + (row.losses - lead_l)) as f64 / 2.0;
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games;
    use crate::test_support::*;
    use liga_core::types::GameStatus;

    #[test]
    fn empty_tournament_has_no_rows() {
        let conn = league();
        let t = tournament(&conn, "2026");
        assert!(compute(&conn, t).unwrap().is_empty());
    }

    #[test]
    fn standings_order_and_games_behind() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let (a, b, c) = (team(&conn, "Aguilas"), team(&conn, "Bravos"), team(&conn, "Cardenales"));
        games::create(&conn, t, &final_game(a, b, 5, 1)).unwrap();
        games::create(&conn, t, &final_game(c, a, 2, 3)).unwrap();
        games::create(&conn, t, &final_game(b, c, 4, 4)).unwrap();
        let mut pending = final_game(a, c, 0, 0);
        pending.status = GameStatus::Scheduled;
        games::create(&conn, t, &pending).unwrap();

        let rows = compute(&conn, t).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.team_name.as_str()).collect();
        // Bravos and Cardenales are both 0-1-1; Cardenales has the better run diff.
        assert_eq!(names, vec!["Aguilas", "Cardenales", "Bravos"]);

        let aguilas = &rows[0];
        assert_eq!((aguilas.played, aguilas.wins, aguilas.losses), (2, 2, 0));
        assert_eq!(aguilas.runs_for, 8);
        assert_eq!(aguilas.runs_against, 3);
        assert_eq!(aguilas.win_pct, 1.0);
        assert_eq!(aguilas.games_behind, 0.0);

        let bravos = &rows[2];
        assert_eq!(bravos.ties, 1);
        assert_eq!(bravos.win_pct, 0.25);
        assert_eq!(bravos.games_behind, 1.5);
    }

    #[test]
    fn other_tournaments_are_ignored() {
        let conn = league();
        let t1 = tournament(&conn, "2025");
        let t2 = tournament(&conn, "2026");
        let (a, b) = (team(&conn, "A"), team(&conn, "B"));
        games::create(&conn, t1, &final_game(a, b, 9, 0)).unwrap();
        games::create(&conn, t2, &final_game(b, a, 1, 0)).unwrap();
        let rows = compute(&conn, t2).unwrap();
        assert_eq!(rows[0].team_name, "B");
        assert_eq!(rows[0].played, 1);
    }
}
