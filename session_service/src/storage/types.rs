use async_trait::async_trait;

use super::errors::StorageError;

/// Persistence backend for session payloads.
///
/// One handler instance serves one session engine for the duration of a
/// request. `read` of an unknown id yields an empty payload, never an error.
#[async_trait]
pub trait SaveHandler: Send + Sync {
    /// Prepare the backend for sessions named `name`. `location` is backend specific
    /// and may be empty.
    async fn open(&mut self, location: &str, name: &str) -> Result<(), StorageError>;

    /// Read the payload stored for `id`, or an empty string if there is none.
    async fn read(&mut self, id: &str) -> Result<String, StorageError>;

    /// Store `data` for `id`.
    async fn write(&mut self, id: &str, data: &str) -> Result<(), StorageError>;

    /// Remove whatever is stored for `id`. Unknown ids are not an error.
    async fn destroy(&mut self, id: &str) -> Result<(), StorageError>;

    /// Remove every record last written more than `max_lifetime` seconds ago.
    /// Returns the number of purged records.
    async fn gc(&mut self, max_lifetime: u64) -> Result<u64, StorageError>;

    async fn close(&mut self) -> Result<(), StorageError>;

    /// Existence tracking capability, for handlers that distinguish insert from update.
    fn existence_aware(&mut self) -> Option<&mut dyn ExistenceAware> {
        None
    }
}

/// Handlers implementing this know whether the current id already has a backing record.
///
/// A successful `read` that finds data sets the flag; a successful `write` always leaves
/// it set. Resetting it forces the next `write` to establish existence again.
pub trait ExistenceAware {
    fn set_exists(&mut self, exists: bool);

    fn exists(&self) -> bool;
}
