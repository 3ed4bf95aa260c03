use http::header::{HeaderMap, USER_AGENT};
use serde_json::Value;

use super::errors::ValidationError;
use super::types::Validator;
use crate::session::Session;
use crate::utils::constant_time_eq;

/// Session key holding the user agent accepted on the first request.
pub const USER_AGENT_KEY: &str = "_session_httpUserAgent";

/// Rejects a session whose client user agent changed since it was first seen.
#[derive(Debug, Clone)]
pub struct UserAgentValidator {
    user_agent: String,
    key: String,
}

impl UserAgentValidator {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            key: USER_AGENT_KEY.to_string(),
        }
    }

    /// Missing or non-UTF-8 headers yield an empty user agent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let user_agent = headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Self::new(user_agent)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Validator for UserAgentValidator {
    fn name(&self) -> &str {
        "UserAgentValidator"
    }

    fn process(&self, session: &mut Session) -> Result<(), ValidationError> {
        let stored = session.get_or(&self.key, self.user_agent.as_str());
        let matches = match &stored {
            Value::String(s) => constant_time_eq(s, &self.user_agent),
            _ => false,
        };
        if !matches {
            tracing::warn!(key = %self.key, "Session user agent changed");
            return Err(ValidationError::new(
                self.name(),
                "Session http user agent validation failed",
            ));
        }

        session.set(&self.key, self.user_agent.as_str());
        Ok(())
    }
}
