use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::Connection;
use tracing::info;

use crate::db::{configure, init_db};
use crate::error::Result;

/// Thread-safe owner of the league database connection.
///
/// Wraps a single SQLite connection in a `Mutex`. Every query function in
/// this crate runs inside [`LeagueStore::with_conn`], so a multi-statement
/// operation (tournament activation) is never interleaved with another
/// request's reads.
pub struct LeagueStore {
    db: Mutex<Connection>,
}

impl LeagueStore {
    /// Wrap an already-open connection, applying pragmas and the schema.
    pub fn new(conn: Connection) -> Result<Self> {
        configure(&conn)?;
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened league database");
        Self::new(conn)
    }

    /// Private database for tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        // Poisoning is ignored: an open transaction rolls back when dropped.
        let mut conn = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut conn)
    }

    /// Cheap round trip used by the health endpoint.
    pub fn ping(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
    }
}
