use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// The write would break a uniqueness or reference rule.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A tournament-scoped write arrived before any tournament was created.
    #[error("no tournament exists yet")]
    NoTournament,
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }

    /// Turn SQLite constraint failures into [`StoreError::Conflict`] with a
    /// readable message; pass everything else through.
    pub fn from_constraint(err: rusqlite::Error, msg: &str) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict(msg.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
