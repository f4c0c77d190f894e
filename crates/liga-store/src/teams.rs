use chrono::Utc;
use liga_core::types::TeamInput;
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::types::Team;

pub fn create(conn: &Connection, input: &TeamInput) -> Result<Team> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO equipos (name, manager, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![input.name, input.manager, now],
    )
    .map_err(|e| StoreError::from_constraint(e, "a team with that name already exists"))?;
    let id = conn.last_insert_rowid();
    info!(team_id = id, name = %input.name, "team created");
    get(conn, id)
}

pub fn update(conn: &Connection, id: i64, input: &TeamInput) -> Result<Team> {
    let n = conn
        .execute(
            "UPDATE equipos SET name = ?1, manager = ?2 WHERE id = ?3",
            rusqlite::params![input.name, input.manager, id],
        )
        .map_err(|e| StoreError::from_constraint(e, "a team with that name already exists"))?;
    if n == 0 {
        return Err(StoreError::not_found("team", id));
    }
    get(conn, id)
}

/// Delete a team. Refused while it still has players or recorded games.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let players: i64 = conn.query_row(
        "SELECT COUNT(*) FROM jugadores WHERE equipo_id = ?1",
        [id],
        |r| r.get(0),
    )?;
    if players > 0 {
        return Err(StoreError::Conflict(format!(
            "team {id} still has {players} players"
        )));
    }
    let n = conn
        .execute("DELETE FROM equipos WHERE id = ?1", [id])
        .map_err(|e| StoreError::from_constraint(e, "team has games on record"))?;
    if n == 0 {
        return Err(StoreError::not_found("team", id));
    }
    info!(team_id = id, "team deleted");
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<Team> {
    conn.query_row(
        "SELECT id, name, manager, created_at FROM equipos WHERE id = ?1",
        [id],
        row_to_team,
    )
    .optional()?
    .ok_or(StoreError::not_found("team", id))
}

/// All teams, alphabetically.
pub fn list(conn: &Connection) -> Result<Vec<Team>> {
    let mut stmt =
        conn.prepare("SELECT id, name, manager, created_at FROM equipos ORDER BY name")?;
    let rows = stmt.query_map([], row_to_team)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn row_to_team(row: &rusqlite::Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        manager: row.get(2)?,
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure, init_db};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        configure(&conn).unwrap();
        init_db(&conn).unwrap();
        conn
    }

    fn input(name: &str) -> TeamInput {
        TeamInput {
            name: name.into(),
            manager: None,
        }
    }

    #[test]
    fn duplicate_names_conflict_case_insensitively() {
        let conn = conn();
        create(&conn, &input("Tigres")).unwrap();
        let err = create(&conn, &input("tigres")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn update_missing_team() {
        let conn = conn();
        assert!(matches!(
            update(&conn, 9, &input("X")),
            Err(StoreError::NotFound { entity: "team", id: 9 })
        ));
    }

    #[test]
    fn list_is_alphabetical() {
        let conn = conn();
        create(&conn, &input("Zorros")).unwrap();
        create(&conn, &input("Aguilas")).unwrap();
        let names: Vec<_> = list(&conn).unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Aguilas", "Zorros"]);
    }

    #[test]
    fn delete_refused_with_players() {
        let conn = conn();
        let team = create(&conn, &input("Leones")).unwrap();
        conn.execute(
            "INSERT INTO jugadores (equipo_id, name, created_at) VALUES (?1, 'Ana', 'now')",
            [team.id],
        )
        .unwrap();
        assert!(matches!(delete(&conn, team.id), Err(StoreError::Conflict(_))));
    }
}
