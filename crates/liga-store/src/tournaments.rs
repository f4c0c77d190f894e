//! Tournaments (seasons) and the "current tournament" rules.
//!
//! Most reads and stat writes are scoped to a tournament. Callers that do
//! not name one get the context from [`resolve`]:
//!
//! 1. an explicit id, if it parses as an integer (no existence check),
//! 2. else the active tournament,
//! 3. else the most recently created tournament (highest id),
//! 4. else `None`: nothing to scope to yet.

use chrono::Utc;
use liga_core::types::TournamentInput;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, instrument};

use crate::error::{Result, StoreError};
use crate::types::Tournament;

const SELECT_COLUMNS: &str = "SELECT id, name, start_date, end_date, active, created_at FROM torneos";

/// Resolve the tournament a request should be scoped to.
///
/// Storage errors are returned unchanged; an empty league is `Ok(None)`.
#[instrument(skip(conn))]
pub fn resolve(conn: &Connection, explicit: Option<&str>) -> Result<Option<i64>> {
    if let Some(id) = explicit.and_then(|raw| raw.trim().parse::<i64>().ok()) {
        return Ok(Some(id));
    }

    // The partial unique index allows one active row; ORDER BY keeps the
    // answer deterministic on databases created before that index existed.
    let active: Option<i64> = conn
        .query_row(
            "SELECT id FROM torneos WHERE active = 1 ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if active.is_some() {
        debug!(?active, "resolved active tournament");
        return Ok(active);
    }

    let latest: Option<i64> = conn
        .query_row(
            "SELECT id FROM torneos ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    debug!(?latest, "no active tournament, falling back to latest");
    Ok(latest)
}

/// Same as [`resolve`] for ids that arrive already typed (JSON bodies).
pub fn resolve_id(conn: &Connection, explicit: Option<i64>) -> Result<Option<i64>> {
    match explicit {
        Some(id) => Ok(Some(id)),
        None => resolve(conn, None),
    }
}

/// Resolve, treating "no tournament at all" as an error for writes.
pub fn require(conn: &Connection, explicit: Option<i64>) -> Result<i64> {
    resolve_id(conn, explicit)?.ok_or(StoreError::NoTournament)
}

/// Make `id` the only active tournament.
///
/// Deactivate-all and activate-one run in a single transaction. When `id`
/// does not exist the transaction is rolled back, so the previously active
/// tournament stays active and the caller gets `NotFound`.
#[instrument(skip(conn))]
pub fn activate(conn: &mut Connection, id: i64) -> Result<Tournament> {
    let tx = conn.transaction()?;
    tx.execute("UPDATE torneos SET active = 0 WHERE active = 1", [])?;
    let updated = tx.execute("UPDATE torneos SET active = 1 WHERE id = ?1", [id])?;
    if updated == 0 {
        // Dropping `tx` rolls back the deactivation above.
        return Err(StoreError::not_found("tournament", id));
    }
    let tournament = get(&tx, id)?;
    tx.commit()?;
    info!(tournament_id = id, name = %tournament.name, "tournament activated");
    Ok(tournament)
}

pub fn create(conn: &Connection, input: &TournamentInput) -> Result<Tournament> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO torneos (name, start_date, end_date, active, created_at)
         VALUES (?1, ?2, ?3, 0, ?4)",
        rusqlite::params![input.name, input.start_date, input.end_date, now],
    )?;
    let id = conn.last_insert_rowid();
    info!(tournament_id = id, name = %input.name, "tournament created");
    get(conn, id)
}

pub fn update(conn: &Connection, id: i64, input: &TournamentInput) -> Result<Tournament> {
    let n = conn.execute(
        "UPDATE torneos SET name = ?1, start_date = ?2, end_date = ?3 WHERE id = ?4",
        rusqlite::params![input.name, input.start_date, input.end_date, id],
    )?;
    if n == 0 {
        return Err(StoreError::not_found("tournament", id));
    }
    get(conn, id)
}

/// Delete a tournament together with its games and stat lines.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM torneos WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(StoreError::not_found("tournament", id));
    }
    info!(tournament_id = id, "tournament deleted");
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<Tournament> {
    find(conn, id)?.ok_or(StoreError::not_found("tournament", id))
}

pub fn find(conn: &Connection, id: i64) -> Result<Option<Tournament>> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], row_to_tournament).optional()?)
}

/// All tournaments, newest first.
pub fn list(conn: &Connection) -> Result<Vec<Tournament>> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_tournament)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn row_to_tournament(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        active: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
    })
}
