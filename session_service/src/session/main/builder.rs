use crate::keystore::KeyStore;
use crate::session::config::{CookieOptions, SessionConfig};
use crate::session::types::SessionState;
use crate::storage::SaveHandler;
use crate::validation::{Validator, ValidatorChain};

use super::engine::Session;
use super::identity::{IdentityTransport, RequestIdentity};

/// Assembles a [`Session`] for one request.
///
/// Without an explicit identity the session uses a [`RequestIdentity`] with
/// no incoming id, so every start issues a new id.
pub struct SessionBuilder {
    config: SessionConfig,
    handler: Option<Box<dyn SaveHandler>>,
    validation: ValidatorChain,
    identity: Option<Box<dyn IdentityTransport>>,
}

impl SessionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(SessionConfig::new(name))
    }

    pub fn from_config(config: SessionConfig) -> Self {
        Self {
            config,
            handler: None,
            validation: ValidatorChain::new(),
            identity: None,
        }
    }

    /// Replace the whole configuration, name included.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_lifetime(mut self, seconds: u64) -> Self {
        self.config.max_lifetime = seconds;
        self
    }

    pub fn save_location(mut self, location: impl Into<String>) -> Self {
        self.config.save_location = location.into();
        self
    }

    pub fn cookie(mut self, cookie: CookieOptions) -> Self {
        self.config.cookie = cookie;
        self
    }

    pub fn save_handler(mut self, handler: impl SaveHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Same as [`save_handler`](Self::save_handler) for handlers handed out by a
    /// [`SaveHandlerFactory`](crate::storage::SaveHandlerFactory).
    pub fn boxed_save_handler(mut self, handler: Box<dyn SaveHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn validation(mut self, chain: ValidatorChain) -> Self {
        self.validation = chain;
        self
    }

    /// Append one validator to the chain.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validation.push(validator);
        self
    }

    pub fn identity(mut self, identity: impl IdentityTransport + 'static) -> Self {
        self.identity = Some(Box::new(identity));
        self
    }

    pub fn build(self) -> Session {
        Session {
            config: self.config,
            store: KeyStore::new(),
            state: SessionState::NotStarted,
            id: None,
            now_keys: Vec::new(),
            once_keys: Vec::new(),
            handler: self.handler,
            validation: self.validation,
            identity: self
                .identity
                .unwrap_or_else(|| Box::new(RequestIdentity::new()) as Box<dyn IdentityTransport>),
        }
    }
}
