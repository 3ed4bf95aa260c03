//! Relational save handler over SQLite or PostgreSQL.
//!
//! Sessions live in one table `(id, data, expiry)` where `expiry` holds the
//! unix time of the last write; garbage collection purges by that column.

mod postgres;
mod sqlite;
mod types;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::StorageError;
use super::schema_validation::is_valid_table_name;
use super::types::{ExistenceAware, SaveHandler};

use postgres::*;
use sqlite::*;
use types::SessionPool;

#[derive(Debug)]
pub struct SqlSaveHandler {
    pool: SessionPool,
    table: String,
    exists: bool,
}

impl Clone for SqlSaveHandler {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            exists: false,
        }
    }
}

impl SqlSaveHandler {
    pub fn sqlite(pool: sqlx::SqlitePool, table: &str) -> Result<Self, StorageError> {
        Self::with_pool(SessionPool::Sqlite(pool), table)
    }

    pub fn postgres(pool: sqlx::PgPool, table: &str) -> Result<Self, StorageError> {
        Self::with_pool(SessionPool::Postgres(pool), table)
    }

    fn with_pool(pool: SessionPool, table: &str) -> Result<Self, StorageError> {
        if !is_valid_table_name(table) {
            return Err(StorageError::InvalidInput(format!(
                "Invalid session table name: {table}"
            )));
        }
        Ok(Self {
            pool,
            table: table.to_string(),
            exists: false,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the session table if it is missing and check its schema.
    #[tracing::instrument(skip(self), fields(table = %self.table, backend = self.pool.backend()))]
    pub async fn init(&self) -> Result<(), StorageError> {
        let table = self.table.as_str();

        match &self.pool {
            SessionPool::Sqlite(pool) => {
                create_table_sqlite(pool, table).await?;
                validate_table_sqlite(pool, table).await
            }
            SessionPool::Postgres(pool) => {
                create_table_postgres(pool, table).await?;
                validate_table_postgres(pool, table).await
            }
        }
    }

    async fn perform_insert(&self, id: &str, data: &str) -> Result<(), StorageError> {
        let expiry = Utc::now().timestamp();

        match &self.pool {
            SessionPool::Sqlite(pool) => insert_sqlite(pool, &self.table, id, data, expiry).await,
            SessionPool::Postgres(pool) => {
                insert_postgres(pool, &self.table, id, data, expiry).await
            }
        }
    }

    async fn perform_update(&self, id: &str, data: &str) -> Result<(), StorageError> {
        let expiry = Utc::now().timestamp();

        match &self.pool {
            SessionPool::Sqlite(pool) => update_sqlite(pool, &self.table, id, data, expiry).await,
            SessionPool::Postgres(pool) => {
                update_postgres(pool, &self.table, id, data, expiry).await
            }
        }
    }
}

#[async_trait]
impl SaveHandler for SqlSaveHandler {
    /// The table is prepared once by `init`; opening a request is free.
    async fn open(&mut self, _location: &str, _name: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn read(&mut self, id: &str) -> Result<String, StorageError> {
        let data = match &self.pool {
            SessionPool::Sqlite(pool) => read_sqlite(pool, &self.table, id).await?,
            SessionPool::Postgres(pool) => read_postgres(pool, &self.table, id).await?,
        };

        match data {
            Some(data) => {
                self.exists = true;
                Ok(data)
            }
            None => Ok(String::new()),
        }
    }

    async fn write(&mut self, id: &str, data: &str) -> Result<(), StorageError> {
        if !self.exists {
            self.read(id).await?;
        }

        if self.exists {
            self.perform_update(id, data).await?;
        } else {
            self.perform_insert(id, data).await?;
        }

        self.exists = true;
        Ok(())
    }

    async fn destroy(&mut self, id: &str) -> Result<(), StorageError> {
        match &self.pool {
            SessionPool::Sqlite(pool) => delete_sqlite(pool, &self.table, id).await,
            SessionPool::Postgres(pool) => delete_postgres(pool, &self.table, id).await,
        }
    }

    #[tracing::instrument(skip(self), fields(table = %self.table))]
    async fn gc(&mut self, max_lifetime: u64) -> Result<u64, StorageError> {
        let max_lifetime = i64::try_from(max_lifetime)
            .map_err(|_| StorageError::InvalidInput("max lifetime out of range".to_string()))?;
        let past = Utc::now().timestamp() - max_lifetime;

        let purged = match &self.pool {
            SessionPool::Sqlite(pool) => gc_sqlite(pool, &self.table, past).await?,
            SessionPool::Postgres(pool) => gc_postgres(pool, &self.table, past).await?,
        };

        tracing::info!(purged, "Session garbage collection completed");
        Ok(purged)
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    fn existence_aware(&mut self) -> Option<&mut dyn ExistenceAware> {
        Some(self)
    }
}

impl ExistenceAware for SqlSaveHandler {
    fn set_exists(&mut self, exists: bool) {
        self.exists = exists;
    }

    fn exists(&self) -> bool {
        self.exists
    }
}
