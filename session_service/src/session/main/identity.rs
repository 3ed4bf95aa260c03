use crate::session::config::CookieOptions;
use crate::session::errors::SessionError;
use crate::utils::{SESSION_ID_BYTES, gen_session_id, is_valid_session_id, redact_id};

/// Establishes and rotates the session identifier on behalf of the engine.
///
/// Implementations own the transport (usually a cookie). The engine only asks
/// for ids and for invalidation; it never touches headers.
pub trait IdentityTransport: Send + Sync {
    /// Returns the id for this request, creating one if the client sent none.
    fn start(&mut self, name: &str, cookie: &CookieOptions) -> Result<String, SessionError>;

    fn current_id(&self) -> Option<&str>;

    /// Replaces the current id with a fresh one.
    fn regenerate(&mut self) -> Result<String, SessionError>;

    fn invalidate(&mut self);

    /// What the host must do with its cookie once the request completes.
    fn command(&self) -> IdentityCommand {
        IdentityCommand::Keep
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityCommand {
    /// The client already holds the right id
    #[default]
    Keep,
    /// Send `id` to the client
    Issue { id: String, cookie: CookieOptions },
    /// Tell the client to drop its id
    Remove { cookie: CookieOptions },
}

/// Identity for a single request, seeded with the id the host read from the
/// incoming cookie.
#[derive(Debug, Clone, Default)]
pub struct RequestIdentity {
    incoming: Option<String>,
    current: Option<String>,
    cookie: CookieOptions,
    command: IdentityCommand,
}

impl RequestIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_incoming(id: impl Into<String>) -> Self {
        Self {
            incoming: Some(id.into()),
            ..Self::default()
        }
    }

    /// `None` or an empty cookie value means the client has no session yet.
    pub fn from_cookie_value(value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(id) => Self::with_incoming(id),
            None => Self::new(),
        }
    }

    fn issue(&mut self) -> Result<String, SessionError> {
        let id = gen_session_id(SESSION_ID_BYTES)?;
        self.current = Some(id.clone());
        self.command = IdentityCommand::Issue {
            id: id.clone(),
            cookie: self.cookie.clone(),
        };
        Ok(id)
    }
}

impl IdentityTransport for RequestIdentity {
    fn start(&mut self, name: &str, cookie: &CookieOptions) -> Result<String, SessionError> {
        self.cookie = cookie.clone();

        if let Some(id) = &self.current {
            return Ok(id.clone());
        }

        match self.incoming.take() {
            Some(id) if is_valid_session_id(&id) => {
                self.current = Some(id.clone());
                self.command = IdentityCommand::Keep;
                Ok(id)
            }
            Some(_) => {
                tracing::debug!(name, "Ignoring malformed incoming session id");
                self.issue()
            }
            None => self.issue(),
        }
    }

    fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn regenerate(&mut self) -> Result<String, SessionError> {
        let old = self.current.take();
        let id = self.issue()?;
        tracing::debug!(
            old = ?old.as_deref().map(redact_id),
            new = %redact_id(&id),
            "Issued replacement session id"
        );
        Ok(id)
    }

    fn invalidate(&mut self) {
        self.incoming = None;
        self.current = None;
        self.command = IdentityCommand::Remove {
            cookie: self.cookie.clone(),
        };
    }

    fn command(&self) -> IdentityCommand {
        self.command.clone()
    }
}
