use std::net::{IpAddr, SocketAddr};

use serde_json::Value;

use super::errors::ValidationError;
use super::types::Validator;
use crate::session::Session;
use crate::utils::constant_time_eq;

/// Session key holding the remote address accepted on the first request.
pub const REMOTE_ADDR_KEY: &str = "_session_remoteAddr";

/// Rejects a session whose client address changed since it was first seen.
///
/// Addresses listed as trusted proxies skip the check entirely.
#[derive(Debug, Clone)]
pub struct RemoteAddrValidator {
    remote_addr: String,
    trusted_proxies: Option<Vec<String>>,
    key: String,
}

impl RemoteAddrValidator {
    pub fn new(remote_addr: impl Into<String>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            trusted_proxies: None,
            key: REMOTE_ADDR_KEY.to_string(),
        }
    }

    pub fn from_socket_addr(addr: SocketAddr) -> Self {
        Self::new(addr.ip().to_string())
    }

    pub fn with_trusted_proxies(mut self, proxies: Vec<String>) -> Self {
        self.trusted_proxies = Some(proxies);
        self
    }

    /// Store the accepted address under `key` instead of the default.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    pub fn trusted_proxies(&self) -> Option<&[String]> {
        self.trusted_proxies.as_deref()
    }
}

impl Validator for RemoteAddrValidator {
    fn name(&self) -> &str {
        "RemoteAddrValidator"
    }

    fn process(&self, session: &mut Session) -> Result<(), ValidationError> {
        if self
            .trusted_proxies
            .as_ref()
            .is_some_and(|proxies| proxies.contains(&self.remote_addr))
        {
            return Ok(());
        }

        if self.remote_addr.parse::<IpAddr>().is_err() {
            return Err(ValidationError::new(self.name(), "Invalid remote address"));
        }

        let stored = session.get_or(&self.key, self.remote_addr.as_str());
        let matches = match &stored {
            Value::String(s) => constant_time_eq(s, &self.remote_addr),
            _ => false,
        };
        if !matches {
            tracing::warn!(key = %self.key, "Session remote address changed");
            return Err(ValidationError::new(
                self.name(),
                "Session remote address validation failed",
            ));
        }

        session.set(&self.key, self.remote_addr.as_str());
        Ok(())
    }
}
