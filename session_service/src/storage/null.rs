use async_trait::async_trait;

use super::errors::StorageError;
use super::types::SaveHandler;

/// Handler that stores nothing. Every session it serves starts out empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSaveHandler;

#[async_trait]
impl SaveHandler for NullSaveHandler {
    async fn open(&mut self, _location: &str, _name: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn read(&mut self, _id: &str) -> Result<String, StorageError> {
        Ok(String::new())
    }

    async fn write(&mut self, _id: &str, _data: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn destroy(&mut self, _id: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn gc(&mut self, _max_lifetime: u64) -> Result<u64, StorageError> {
        Ok(0)
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}
