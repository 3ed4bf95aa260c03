use std::fmt;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::keystore::KeyStore;
use crate::session::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::session::types::{EXPIRES_KEY, FLASH_ONCE_KEY, SessionState};
use crate::storage::SaveHandler;
use crate::utils::{is_valid_session_id, is_valid_session_name, redact_id};
use crate::validation::{Validator, ValidatorChain};

use super::expiry::is_expired;
use super::flash::{key_list, reconcile, record_flash};
use super::identity::IdentityTransport;

/// Session state for one request.
///
/// Build one with [`SessionBuilder`](super::SessionBuilder), call
/// [`start`](Session::start) before touching data and [`save`](Session::save)
/// when the request is done.
pub struct Session {
    pub(super) config: SessionConfig,
    pub(super) store: KeyStore,
    pub(super) state: SessionState,
    pub(super) id: Option<String>,
    pub(super) now_keys: Vec<String>,
    pub(super) once_keys: Vec<String>,
    pub(super) handler: Option<Box<dyn SaveHandler>>,
    pub(super) validation: ValidatorChain,
    pub(super) identity: Box<dyn IdentityTransport>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.config.name)
            .field("state", &self.state)
            .field("id", &self.id.as_deref().map(redact_id))
            .field("keys", &self.store.len())
            .field("has_save_handler", &self.handler.is_some())
            .field("validation", &self.validation)
            .finish()
    }
}

impl Session {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// `None` until the first successful start, and again after destroy.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn identity(&self) -> &dyn IdentityTransport {
        self.identity.as_ref()
    }

    /// Load the session.
    ///
    /// On [`SessionError::Expired`] and [`SessionError::Validation`] the session
    /// is left loaded and active so the caller can destroy or restart it.
    /// Starting an active or closed session does nothing; starting a destroyed
    /// one begins a fresh session.
    #[tracing::instrument(skip(self), fields(name = %self.config.name))]
    pub async fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Active | SessionState::Closed => {
                tracing::debug!(state = ?self.state, "Session already started");
                return Ok(());
            }
            SessionState::NotStarted | SessionState::Destroyed => {}
        }

        if !is_valid_session_name(&self.config.name) {
            return Err(SessionError::Start(
                "Session name must be alphanumeric only".to_string(),
            ));
        }

        let id = self
            .identity
            .start(&self.config.name, &self.config.cookie)
            .map_err(|e| match e {
                SessionError::Start(_) => e,
                other => SessionError::Start(format!("Failed to establish session id: {other}")),
            })?;

        if !is_valid_session_id(&id) {
            return Err(SessionError::Start("Invalid session id".to_string()));
        }

        let payload = match self.handler.as_mut() {
            Some(handler) => {
                handler
                    .open(&self.config.save_location, &self.config.name)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "Failed to open session save handler");
                        SessionError::Start(format!("Failed to open save handler: {e}"))
                    })?;
                handler.read(&id).await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to read session data");
                    SessionError::Start(format!("Failed to read session data: {e}"))
                })?
            }
            None => String::new(),
        };

        self.store =
            KeyStore::decode(&payload).map_err(|e| SessionError::Start(e.to_string()))?;
        self.now_keys.clear();
        self.once_keys.clear();
        tracing::debug!(id = %redact_id(&id), keys = self.store.len(), "Session loaded");
        self.id = Some(id);
        self.state = SessionState::Active;

        if is_expired(
            &mut self.store,
            self.config.max_lifetime,
            Utc::now().timestamp(),
        ) {
            tracing::warn!("Session expired");
            return Err(SessionError::Expired);
        }

        // Validators need the whole session, so the chain is moved out while it runs.
        let validation = std::mem::take(&mut self.validation);
        let result = validation.process(self);
        self.validation = validation;
        if let Err(e) = result {
            tracing::warn!(
                validator = e.validator(),
                message = e.message(),
                "Session validation failed"
            );
            return Err(SessionError::Validation(e));
        }

        self.once_keys = key_list(&self.store, FLASH_ONCE_KEY);
        Ok(())
    }

    /// Reconcile flash data and write the payload. Only the first save of an
    /// active session does anything.
    #[tracing::instrument(skip(self), fields(name = %self.config.name))]
    pub async fn save(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            tracing::debug!(state = ?self.state, "Session not active, nothing to save");
            return Ok(());
        }

        reconcile(&mut self.store, &mut self.now_keys, &self.once_keys);
        self.state = SessionState::Closed;

        let (Some(handler), Some(id)) = (self.handler.as_mut(), self.id.as_deref()) else {
            return Ok(());
        };

        let payload = self
            .store
            .encode()
            .map_err(|e| SessionError::Save(e.to_string()))?;

        let written = handler.write(id, &payload).await;
        let closed = handler.close().await;

        written.map_err(|e| {
            tracing::error!(error = %e, "Failed to write session data");
            SessionError::Save(format!("Write session data and end session failed: {e}"))
        })?;
        closed.map_err(|e| {
            tracing::error!(error = %e, "Failed to close session save handler");
            SessionError::Save(format!("Write session data and end session failed: {e}"))
        })?;

        tracing::debug!(id = %redact_id(id), bytes = payload.len(), "Session saved");
        Ok(())
    }

    /// Drop all data, invalidate the identity and purge the stored record.
    /// Does nothing unless the session is active.
    #[tracing::instrument(skip(self), fields(name = %self.config.name))]
    pub async fn destroy(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            tracing::debug!(state = ?self.state, "No active session to destroy");
            return Ok(());
        }

        self.store.clear();
        self.now_keys.clear();
        self.once_keys.clear();
        self.identity.invalidate();
        self.state = SessionState::Destroyed;

        let Some(id) = self.id.take() else {
            return Ok(());
        };

        if let Some(handler) = self.handler.as_mut() {
            handler
                .destroy(&id)
                .await
                .map_err(|e| SessionError::Storage(e.to_string()))?;
            if let Some(aware) = handler.existence_aware() {
                aware.set_exists(false);
            }
            handler
                .close()
                .await
                .map_err(|e| SessionError::Storage(e.to_string()))?;
        }

        tracing::info!(id = %redact_id(&id), "Session destroyed");
        Ok(())
    }

    /// Move the session data to a new id. With `delete_old` the record under
    /// the previous id is purged.
    #[tracing::instrument(skip(self), fields(name = %self.config.name))]
    pub async fn regenerate_id(&mut self, delete_old: bool) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::Regenerate(
                "Session ID cannot be regenerated when there is no active session".to_string(),
            ));
        }

        if let Some(aware) = self.handler.as_mut().and_then(|h| h.existence_aware()) {
            aware.set_exists(false);
        }

        let new_id = self
            .identity
            .regenerate()
            .map_err(|e| SessionError::Regenerate(e.to_string()))?;
        if !is_valid_session_id(&new_id) {
            return Err(SessionError::Regenerate("Invalid session id".to_string()));
        }

        let old_id = self.id.replace(new_id);

        if delete_old {
            if let (Some(handler), Some(old)) = (self.handler.as_mut(), old_id.as_deref()) {
                handler
                    .destroy(old)
                    .await
                    .map_err(|e| SessionError::Regenerate(e.to_string()))?;
            }
        }

        tracing::info!(
            old = ?old_id.as_deref().map(redact_id),
            new = ?self.id.as_deref().map(redact_id),
            delete_old,
            "Session id regenerated"
        );
        Ok(())
    }

    /// Read a value. Reading a once value consumes it.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let value = self.store.get(key).cloned();

        if let Some(pos) = self.once_keys.iter().position(|k| k == key) {
            self.once_keys.remove(pos);
            self.store.delete(key);
            tracing::debug!(key, "Once value consumed");
        }

        value
    }

    pub fn get_or(&mut self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Read a value and deserialize it. Missing and mistyped values give `None`.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn has(&self, key: &str) -> bool {
        self.store.has(key)
    }

    pub fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.store.has(key))
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.store.set(key, value.into());
        self
    }

    pub fn delete(&mut self, key: &str) -> &mut Self {
        self.store.delete(key);
        self
    }

    /// Clear all data except the expiry mark.
    pub fn delete_all(&mut self) -> &mut Self {
        let expires = self.store.get(EXPIRES_KEY).cloned();
        self.store.clear();
        self.now_keys.clear();
        self.once_keys.clear();
        if let Some(expires) = expires {
            self.store.set(EXPIRES_KEY, expires);
        }
        self
    }

    pub fn all(&self) -> &Map<String, Value> {
        self.store.as_map()
    }

    /// Set a value that lives through this request and the next one.
    pub fn flash(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.store.set(key, value.into());
        record_flash(&mut self.store, key);
        self
    }

    /// Set a value for the rest of this request only.
    pub fn now(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.store.set(key, value.into());
        if !self.now_keys.iter().any(|k| k == key) {
            self.now_keys.push(key.to_string());
        }
        self
    }

    /// Set a value that disappears on its first read, whenever that is.
    pub fn once(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.store.set(key, value.into());
        if !self.once_keys.iter().any(|k| k == key) {
            self.once_keys.push(key.to_string());
        }
        self
    }
}
