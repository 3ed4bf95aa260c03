use thiserror::Error;

/// Failures reported by a save handler.
#[derive(Debug, Error, Clone)]
pub enum StorageError {
    /// The backend failed to open, read, write, destroy or collect a session record
    #[error("Session store error: {0}")]
    Storage(String),

    /// A handler type, table name, URL or lifetime that cannot be used
    #[error("Invalid save handler setting: {0}")]
    InvalidInput(String),
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::Storage(format!("redis: {err}"))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::Storage(format!("database: {}", db.message())),
            other => Self::Storage(format!("sql: {other}")),
        }
    }
}
