use session_service::{
    IdentityCommand, RemoteAddrValidator, RequestIdentity, SaveHandler, Session, SessionBuilder,
    SqlSaveHandler, UserAgentValidator, ValidatorChain,
};
use sqlx::sqlite::SqlitePoolOptions;

pub const SESSION_NAME: &str = "testsess";

/// Client side of the session: where requests come from and which id its cookie holds.
#[derive(Debug, Clone)]
pub struct Browser {
    pub cookie: Option<String>,
    pub addr: String,
    pub user_agent: String,
}

impl Browser {
    pub fn new() -> Self {
        Self {
            cookie: None,
            addr: "203.0.113.10".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
        }
    }

    /// Session for the next request from this browser.
    pub fn session(&self, handler: impl SaveHandler + 'static) -> Session {
        SessionBuilder::new(SESSION_NAME)
            .save_handler(handler)
            .identity(RequestIdentity::from_cookie_value(self.cookie.as_deref()))
            .build()
    }

    /// Like [`Browser::session`] with address and user agent validation.
    pub fn validated_session(&self, handler: impl SaveHandler + 'static) -> Session {
        let validation = ValidatorChain::new()
            .with(RemoteAddrValidator::new(self.addr.as_str()))
            .with(UserAgentValidator::new(self.user_agent.as_str()));

        SessionBuilder::new(SESSION_NAME)
            .save_handler(handler)
            .validation(validation)
            .identity(RequestIdentity::from_cookie_value(self.cookie.as_deref()))
            .build()
    }

    /// Apply the cookie instruction of a finished request.
    pub fn accept(&mut self, session: &Session) {
        match session.identity().command() {
            IdentityCommand::Keep => {}
            IdentityCommand::Issue { id, .. } => self.cookie = Some(id),
            IdentityCommand::Remove { .. } => self.cookie = None,
        }
    }
}

pub async fn sqlite_handler(table: &str) -> SqlSaveHandler {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");
    let handler = SqlSaveHandler::sqlite(pool, table).expect("valid table name");
    handler.init().await.expect("Failed to create session table");
    handler
}
