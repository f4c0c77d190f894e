use chrono::Utc;
use liga_core::types::{GameInput, GameStatus};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::types::Game;

const SELECT_COLUMNS: &str = "SELECT p.id, p.torneo_id, p.equipo_local_id, l.name,
            p.equipo_visitante_id, v.name, p.date, p.home_runs, p.away_runs, p.status
     FROM partidos p
     JOIN equipos l ON l.id = p.equipo_local_id
     JOIN equipos v ON v.id = p.equipo_visitante_id";

/// Schedule or record a game in `tournament_id` (already resolved by the caller).
pub fn create(conn: &Connection, tournament_id: i64, input: &GameInput) -> Result<Game> {
    check_refs(conn, tournament_id, input)?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO partidos
         (torneo_id, equipo_local_id, equipo_visitante_id, date, home_runs, away_runs, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            tournament_id,
            input.home_team_id,
            input.away_team_id,
            input.date,
            input.home_runs,
            input.away_runs,
            input.status.as_str(),
            now
        ],
    )?;
    let id = conn.last_insert_rowid();
    info!(game_id = id, tournament_id, status = input.status.as_str(), "game created");
    get(conn, id)
}

pub fn update(conn: &Connection, id: i64, tournament_id: i64, input: &GameInput) -> Result<Game> {
    check_refs(conn, tournament_id, input)?;
    let n = conn.execute(
        "UPDATE partidos
         SET torneo_id = ?1, equipo_local_id = ?2, equipo_visitante_id = ?3, date = ?4,
             home_runs = ?5, away_runs = ?6, status = ?7
         WHERE id = ?8",
        rusqlite::params![
            tournament_id,
            input.home_team_id,
            input.away_team_id,
            input.date,
            input.home_runs,
            input.away_runs,
            input.status.as_str(),
            id
        ],
    )?;
    if n == 0 {
        return Err(StoreError::not_found("game", id));
    }
    info!(game_id = id, status = input.status.as_str(), "game updated");
    get(conn, id)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM partidos WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(StoreError::not_found("game", id));
    }
    info!(game_id = id, "game deleted");
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<Game> {
    let sql = format!("{SELECT_COLUMNS} WHERE p.id = ?1");
    conn.query_row(&sql, [id], row_to_game)
        .optional()?
        .ok_or(StoreError::not_found("game", id))
}

/// Games in date order, optionally restricted to a tournament and/or a team.
pub fn list(conn: &Connection, tournament_id: Option<i64>, team_id: Option<i64>) -> Result<Vec<Game>> {
    let sql = format!(
        "{SELECT_COLUMNS}
         WHERE (?1 IS NULL OR p.torneo_id = ?1)
           AND (?2 IS NULL OR p.equipo_local_id = ?2 OR p.equipo_visitante_id = ?2)
         ORDER BY p.date, p.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params![tournament_id, team_id], row_to_game)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn check_refs(conn: &Connection, tournament_id: i64, input: &GameInput) -> Result<()> {
    crate::tournaments::get(conn, tournament_id)?;
    crate::teams::get(conn, input.home_team_id)?;
    crate::teams::get(conn, input.away_team_id)?;
    Ok(())
}

fn row_to_game(row: &rusqlite::Row<'_>) -> rusqlite::Result<Game> {
    let status: String = row.get(9)?;
    Ok(Game {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        home_team_id: row.get(2)?,
        home_team_name: row.get(3)?,
        away_team_id: row.get(4)?,
        away_team_name: row.get(5)?,
        date: row.get(6)?,
        home_runs: row.get(7)?,
        away_runs: row.get(8)?,
        // Rows are only written through this module, so the value is known.
        status: status.parse().unwrap_or(GameStatus::Scheduled),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn create_checks_references() {
        let conn = league();
        let t = tournament(&conn, "2026");
        let err = create(&conn, t, &final_game(1, 99, 3, 2)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "team", id: 99 }));
        let err = create(&conn, 77, &final_game(1, 2, 3, 2)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "tournament", .. }));
    }

    #[test]
    fn list_filters_by_team_and_tournament() {
        let conn = league();
        let t1 = tournament(&conn, "2025");
        let t2 = tournament(&conn, "2026");
        let (a, b, c) = (team(&conn, "A"), team(&conn, "B"), team(&conn, "C"));
        create(&conn, t1, &final_game(a, b, 1, 0)).unwrap();
        create(&conn, t2, &final_game(b, c, 2, 2)).unwrap();
        create(&conn, t2, &final_game(c, a, 5, 4)).unwrap();

        assert_eq!(list(&conn, None, None).unwrap().len(), 3);
        assert_eq!(list(&conn, Some(t2), None).unwrap().len(), 2);
        assert_eq!(list(&conn, Some(t2), Some(a)).unwrap().len(), 1);
        let g = &list(&conn, Some(t1), None).unwrap()[0];
        assert_eq!(g.home_team_name, "A");
        assert_eq!(g.status, GameStatus::Final);
    }
}
