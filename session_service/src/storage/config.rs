//! Save handler configuration

use std::{env, str::FromStr, sync::LazyLock};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::data_store::SqlSaveHandler;
use super::errors::StorageError;
use super::memory::MemorySaveHandler;
use super::null::NullSaveHandler;
use super::redis::RedisSaveHandler;
use super::types::SaveHandler;

pub static SESSION_SAVE_HANDLER_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("SESSION_SAVE_HANDLER_TYPE").unwrap_or_else(|_| "null".to_string())
});

pub static SESSION_SAVE_HANDLER_URL: LazyLock<Option<String>> =
    LazyLock::new(|| env::var("SESSION_SAVE_HANDLER_URL").ok());

/// Session table name for the relational handler
pub static SESSION_TABLE: LazyLock<String> =
    LazyLock::new(|| env::var("SESSION_TABLE").unwrap_or_else(|_| "sessions".to_string()));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveHandlerType {
    Null,
    Memory,
    Redis,
    Sqlite,
    Postgres,
}

impl FromStr for SaveHandlerType {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" | "none" => Ok(Self::Null),
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            t => Err(StorageError::InvalidInput(format!(
                "Unsupported save handler type: {t}. Supported types are 'null', 'memory', 'redis', 'sqlite' and 'postgres'"
            ))),
        }
    }
}

/// Holds the shared connection state of a configured backend and hands out one
/// fresh save handler per request.
#[derive(Debug, Clone)]
pub enum SaveHandlerFactory {
    Null,
    Memory(MemorySaveHandler),
    Redis(RedisSaveHandler),
    Sql(SqlSaveHandler),
}

impl SaveHandlerFactory {
    /// Connect to the backend described by `kind` and `url`. `ttl` is the session
    /// lifetime in seconds, used by backends with native expiry.
    pub async fn connect(
        kind: SaveHandlerType,
        url: Option<&str>,
        table: &str,
        ttl: u64,
    ) -> Result<Self, StorageError> {
        tracing::info!(?kind, table, "Initializing session save handler");

        let require_url = || {
            url.ok_or_else(|| {
                StorageError::InvalidInput(format!(
                    "SESSION_SAVE_HANDLER_URL must be set for the {kind:?} save handler"
                ))
            })
        };

        let factory = match kind {
            SaveHandlerType::Null => Self::Null,
            SaveHandlerType::Memory => Self::Memory(MemorySaveHandler::new()),
            SaveHandlerType::Redis => {
                let client = redis::Client::open(require_url()?)?;
                let handler = RedisSaveHandler::new(client, ttl);
                handler.init().await?;
                Self::Redis(handler)
            }
            SaveHandlerType::Sqlite => {
                let url = require_url()?;
                let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
                // Every connection to an in-memory database sees its own database.
                let max_connections = if url.contains(":memory:") || url.contains("mode=memory") {
                    1
                } else {
                    5
                };
                let pool = SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .connect_with(opts)
                    .await?;
                let handler = SqlSaveHandler::sqlite(pool, table)?;
                handler.init().await?;
                Self::Sql(handler)
            }
            SaveHandlerType::Postgres => {
                let pool = sqlx::PgPool::connect_lazy(require_url()?)?;
                let handler = SqlSaveHandler::postgres(pool, table)?;
                handler.init().await?;
                Self::Sql(handler)
            }
        };

        tracing::info!(?kind, "Session save handler ready");
        Ok(factory)
    }

    /// Connect using `SESSION_SAVE_HANDLER_TYPE`, `SESSION_SAVE_HANDLER_URL` and `SESSION_TABLE`.
    pub async fn from_env(ttl: u64) -> Result<Self, StorageError> {
        let kind = SaveHandlerType::from_str(SESSION_SAVE_HANDLER_TYPE.as_str())?;
        Self::connect(
            kind,
            SESSION_SAVE_HANDLER_URL.as_deref(),
            SESSION_TABLE.as_str(),
            ttl,
        )
        .await
    }

    /// A handler for one request. Handlers share the backend but not their existence state.
    pub fn create(&self) -> Box<dyn SaveHandler> {
        match self {
            Self::Null => Box::new(NullSaveHandler),
            Self::Memory(handler) => Box::new(handler.clone()),
            Self::Redis(handler) => Box::new(handler.clone()),
            Self::Sql(handler) => Box::new(handler.clone()),
        }
    }
}
