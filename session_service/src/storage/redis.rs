use async_trait::async_trait;
use redis::{self, AsyncCommands};

use super::errors::StorageError;
use super::types::SaveHandler;

const SESSION_PREFIX: &str = "session";

/// Handler backed by Redis. Records expire natively after `ttl` seconds, so
/// `gc` has nothing to do and writes are plain upserts.
#[derive(Debug, Clone)]
pub struct RedisSaveHandler {
    client: redis::Client,
    namespace: String,
    ttl: u64,
}

impl RedisSaveHandler {
    pub fn new(client: redis::Client, ttl: u64) -> Self {
        Self {
            client,
            namespace: String::new(),
            ttl,
        }
    }

    /// Verify the TTL is usable and the connection works.
    pub async fn init(&self) -> Result<(), StorageError> {
        self.ttl_seconds()?;
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    /// `SET .. EX 0` is rejected by Redis, and a zero lifetime would drop every write.
    fn ttl_seconds(&self) -> Result<u64, StorageError> {
        if self.ttl == 0 {
            return Err(StorageError::InvalidInput(
                "Redis session TTL must be at least one second".to_string(),
            ));
        }
        Ok(self.ttl)
    }

    fn make_key(namespace: &str, id: &str) -> String {
        if namespace.is_empty() {
            format!("{SESSION_PREFIX}:{id}")
        } else {
            format!("{SESSION_PREFIX}:{namespace}:{id}")
        }
    }
}

#[async_trait]
impl SaveHandler for RedisSaveHandler {
    async fn open(&mut self, _location: &str, name: &str) -> Result<(), StorageError> {
        self.namespace = name.to_string();
        Ok(())
    }

    async fn read(&mut self, id: &str) -> Result<String, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(&self.namespace, id);
        let value: Option<String> = conn.get(&key).await?;
        Ok(value.unwrap_or_default())
    }

    async fn write(&mut self, id: &str, data: &str) -> Result<(), StorageError> {
        let ttl = self.ttl_seconds()?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(&self.namespace, id);
        let _: () = conn.set_ex(&key, data, ttl).await?;
        Ok(())
    }

    async fn destroy(&mut self, id: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(&self.namespace, id);
        let _: () = conn.del(&key).await?;
        Ok(())
    }

    async fn gc(&mut self, _max_lifetime: u64) -> Result<u64, StorageError> {
        tracing::debug!("Redis expires session keys natively, nothing to collect");
        Ok(0)
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}
