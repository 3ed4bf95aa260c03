use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::errors::StorageError;
use super::types::{ExistenceAware, SaveHandler};

#[derive(Debug, Clone)]
struct MemoryRecord {
    data: String,
    last_write: i64,
}

/// Number of insert and update statements a memory handler has executed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    pub inserts: u64,
    pub updates: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<String, MemoryRecord>,
    stats: WriteStats,
}

/// Process-local handler. Clones share the same records, so one clone can be
/// handed to each request while the data outlives them.
///
/// Inserts and updates behave like their SQL counterparts: inserting an id that
/// already exists fails, updating an id that does not exist changes nothing.
#[derive(Debug, Default)]
pub struct MemorySaveHandler {
    state: Arc<Mutex<MemoryState>>,
    exists: bool,
}

impl Clone for MemorySaveHandler {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            exists: false,
        }
    }
}

impl MemorySaveHandler {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session save handler");
        Self::default()
    }

    /// Number of stored session records.
    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> WriteStats {
        self.state.lock().await.stats
    }

    /// Payload stored for `id` without touching the existence flag.
    pub async fn peek(&self, id: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .records
            .get(id)
            .map(|record| record.data.clone())
    }

    async fn perform_insert(&self, id: &str, data: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        if state.records.contains_key(id) {
            return Err(StorageError::Storage(
                "Duplicate session id on insert".to_string(),
            ));
        }
        state.records.insert(
            id.to_string(),
            MemoryRecord {
                data: data.to_string(),
                last_write: Utc::now().timestamp(),
            },
        );
        state.stats.inserts += 1;
        Ok(())
    }

    async fn perform_update(&self, id: &str, data: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        if let Some(record) = state.records.get_mut(id) {
            record.data = data.to_string();
            record.last_write = Utc::now().timestamp();
        }
        state.stats.updates += 1;
        Ok(())
    }

    #[cfg(test)]
    async fn put_record_at(&self, id: &str, data: &str, last_write: i64) {
        self.state.lock().await.records.insert(
            id.to_string(),
            MemoryRecord {
                data: data.to_string(),
                last_write,
            },
        );
    }
}

#[async_trait]
impl SaveHandler for MemorySaveHandler {
    async fn open(&mut self, _location: &str, _name: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn read(&mut self, id: &str) -> Result<String, StorageError> {
        let state = self.state.lock().await;
        match state.records.get(id) {
            Some(record) => {
                self.exists = true;
                Ok(record.data.clone())
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
        self.state.lock().await.records.remove(id);
        Ok(())
    }

    async fn gc(&mut self, max_lifetime: u64) -> Result<u64, StorageError> {
        let max_lifetime = i64::try_from(max_lifetime)
            .map_err(|_| StorageError::InvalidInput("max lifetime out of range".to_string()))?;
        let past = Utc::now().timestamp() - max_lifetime;

        let mut state = self.state.lock().await;
        let before = state.records.len();
        state.records.retain(|_, record| record.last_write > past);
        let purged = (before - state.records.len()) as u64;

        tracing::debug!(purged, "Memory save handler garbage collection done");
        Ok(purged)
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    fn existence_aware(&mut self) -> Option<&mut dyn ExistenceAware> {
        Some(self)
    }
}

impl ExistenceAware for MemorySaveHandler {
    fn set_exists(&mut self, exists: bool) {
        self.exists = exists;
    }

    fn exists(&self) -> bool {
        self.exists
    }
}
