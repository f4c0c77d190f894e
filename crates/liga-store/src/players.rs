use chrono::Utc;
use liga_core::types::PlayerInput;
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::types::Player;

const SELECT_COLUMNS: &str = "SELECT j.id, j.equipo_id, e.name, j.name, j.number, j.position, j.created_at
     FROM jugadores j JOIN equipos e ON e.id = j.equipo_id";

pub fn create(conn: &Connection, input: &PlayerInput) -> Result<Player> {
    crate::teams::get(conn, input.team_id)?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO jugadores (equipo_id, name, number, position, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![input.team_id, input.name, input.number, input.position, now],
    )?;
    let id = conn.last_insert_rowid();
    info!(player_id = id, team_id = input.team_id, "player created");
    get(conn, id)
}

pub fn update(conn: &Connection, id: i64, input: &PlayerInput) -> Result<Player> {
    crate::teams::get(conn, input.team_id)?;
    let n = conn.execute(
        "UPDATE jugadores SET equipo_id = ?1, name = ?2, number = ?3, position = ?4 WHERE id = ?5",
        rusqlite::params![input.team_id, input.name, input.number, input.position, id],
    )?;
    if n == 0 {
        return Err(StoreError::not_found("player", id));
    }
    get(conn, id)
}

/// Delete a player and every stat line recorded for them.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM jugadores WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(StoreError::not_found("player", id));
    }
    info!(player_id = id, "player deleted");
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<Player> {
    let sql = format!("{SELECT_COLUMNS} WHERE j.id = ?1");
    conn.query_row(&sql, [id], row_to_player)
        .optional()?
        .ok_or(StoreError::not_found("player", id))
}

/// Players ordered by team then name, optionally restricted to one team.
pub fn list(conn: &Connection, team_id: Option<i64>) -> Result<Vec<Player>> {
    let sql = format!(
        "{SELECT_COLUMNS} WHERE (?1 IS NULL OR j.equipo_id = ?1) ORDER BY e.name, j.name"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([team_id], row_to_player)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn row_to_player(row: &rusqlite::Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        team_id: row.get(1)?,
        team_name: row.get(2)?,
        name: row.get(3)?,
        number: row.get(4)?,
        position: row.get(5)?,
        created_at: row.get(6)?,
    })
}
