use rusqlite::Connection;

use crate::error::Result;

/// Apply per-connection pragmas. Foreign keys are off by default in SQLite.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(())
}

/// Initialise the league schema.
///
/// Idempotent: every statement uses `IF NOT EXISTS`.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS torneos (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT    NOT NULL,
            start_date  TEXT,
            end_date    TEXT,
            active      INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT    NOT NULL
        );
        -- Backstop for the single-active rule; activation keeps it via a transaction.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_torneos_single_active
            ON torneos (active) WHERE active = 1;

        CREATE TABLE IF NOT EXISTS equipos (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT    NOT NULL UNIQUE COLLATE NOCASE,
            manager     TEXT,
            created_at  TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS jugadores (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            equipo_id   INTEGER NOT NULL REFERENCES equipos (id),
            name        TEXT    NOT NULL,
            number      INTEGER,
            position    TEXT,
            created_at  TEXT    NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_jugadores_equipo ON jugadores (equipo_id);

        CREATE TABLE IF NOT EXISTS partidos (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            torneo_id            INTEGER NOT NULL REFERENCES torneos (id) ON DELETE CASCADE,
            equipo_local_id      INTEGER NOT NULL REFERENCES equipos (id),
            equipo_visitante_id  INTEGER NOT NULL REFERENCES equipos (id),
            date                 TEXT    NOT NULL,
            home_runs            INTEGER,
            away_runs            INTEGER,
            status               TEXT    NOT NULL DEFAULT 'programado',
            created_at           TEXT    NOT NULL,
            CHECK (equipo_local_id <> equipo_visitante_id)
        );
        CREATE INDEX IF NOT EXISTS idx_partidos_torneo ON partidos (torneo_id, date);

        CREATE TABLE IF NOT EXISTS estadisticas_ofensivas (
            jugador_id         INTEGER NOT NULL REFERENCES jugadores (id) ON DELETE CASCADE,
            torneo_id          INTEGER NOT NULL REFERENCES torneos (id) ON DELETE CASCADE,
            plate_appearances  INTEGER NOT NULL DEFAULT 0,
            at_bats            INTEGER NOT NULL DEFAULT 0,
            hits               INTEGER NOT NULL DEFAULT 0,
            doubles            INTEGER NOT NULL DEFAULT 0,
            triples            INTEGER NOT NULL DEFAULT 0,
            home_runs          INTEGER NOT NULL DEFAULT 0,
            rbi                INTEGER NOT NULL DEFAULT 0,
            runs               INTEGER NOT NULL DEFAULT 0,
            walks              INTEGER NOT NULL DEFAULT 0,
            strikeouts         INTEGER NOT NULL DEFAULT 0,
            stolen_bases       INTEGER NOT NULL DEFAULT 0,
            hit_by_pitch       INTEGER NOT NULL DEFAULT 0,
            sacrifice_flies    INTEGER NOT NULL DEFAULT 0,
            updated_at         TEXT    NOT NULL,
            PRIMARY KEY (jugador_id, torneo_id)
        );

        CREATE TABLE IF NOT EXISTS estadisticas_pitcheo (
            jugador_id       INTEGER NOT NULL REFERENCES jugadores (id) ON DELETE CASCADE,
            torneo_id        INTEGER NOT NULL REFERENCES torneos (id) ON DELETE CASCADE,
            innings_pitched  REAL    NOT NULL DEFAULT 0,
            hits_allowed     INTEGER NOT NULL DEFAULT 0,
            runs_allowed     INTEGER NOT NULL DEFAULT 0,
            earned_runs      INTEGER NOT NULL DEFAULT 0,
            walks_allowed    INTEGER NOT NULL DEFAULT 0,
            strikeouts       INTEGER NOT NULL DEFAULT 0,
            wins             INTEGER NOT NULL DEFAULT 0,
            losses           INTEGER NOT NULL DEFAULT 0,
            saves            INTEGER NOT NULL DEFAULT 0,
            updated_at       TEXT    NOT NULL,
            PRIMARY KEY (jugador_id, torneo_id)
        );

        CREATE TABLE IF NOT EXISTS estadisticas_defensivas (
            jugador_id    INTEGER NOT NULL REFERENCES jugadores (id) ON DELETE CASCADE,
            torneo_id     INTEGER NOT NULL REFERENCES torneos (id) ON DELETE CASCADE,
            putouts       INTEGER NOT NULL DEFAULT 0,
            assists       INTEGER NOT NULL DEFAULT 0,
            errors        INTEGER NOT NULL DEFAULT 0,
            double_plays  INTEGER NOT NULL DEFAULT 0,
            updated_at    TEXT    NOT NULL,
            PRIMARY KEY (jugador_id, torneo_id)
        );
        ",
    )?;
    Ok(())
}
