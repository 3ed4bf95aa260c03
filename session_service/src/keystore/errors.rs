use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyStoreError {
    #[error("Failed to encode session payload: {0}")]
    Encode(String),

    #[error("Failed to decode session payload: {0}")]
    Decode(String),
}
