use thiserror::Error;

use crate::utils::UtilError;
use crate::validation::ValidationError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// Malformed name or id, or the session could not be loaded
    #[error("Session start error: {0}")]
    Start(String),

    /// The payload is past its expiry mark. The session stays loaded.
    #[error("Session expired")]
    Expired,

    #[error("Session validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Session save error: {0}")]
    Save(String),

    #[error("Session regenerate error: {0}")]
    Regenerate(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
