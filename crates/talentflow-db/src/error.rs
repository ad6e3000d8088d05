//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// The store could not be reached or refused the call. Nothing was written.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;

impl From<DbError> for talentflow_core::Error {
    fn from(err: DbError) -> Self {
        use talentflow_core::Error;

        match err {
            DbError::Duplicate(msg) => Error::Conflict(msg),
            DbError::Unavailable(msg) => Error::Transient(msg),
            DbError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => {
                Error::Transient(err.to_string())
            }
            _ => Error::Internal(err.to_string()),
        }
    }
}
