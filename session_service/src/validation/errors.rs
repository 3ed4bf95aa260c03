use thiserror::Error;

/// Rejection raised by a validator. Names the validator that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{validator}: {message}")]
pub struct ValidationError {
    validator: String,
    message: String,
}

impl ValidationError {
    pub fn new(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
        }
    }

    /// Name of the validator that rejected the session.
    pub fn validator(&self) -> &str {
        &self.validator
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
