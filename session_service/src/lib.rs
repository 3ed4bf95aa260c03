//! session-service - server-side session state for request/response applications
//!
//! A [`Session`] owns the data of one client session for the duration of one
//! request. It loads the payload through a pluggable [`SaveHandler`], checks
//! expiry, runs a [`ValidatorChain`], and on save reconciles flash values and
//! writes the payload back.
//!
//! ```no_run
//! use session_service::{MemorySaveHandler, RequestIdentity, SessionBuilder};
//!
//! # async fn handle(incoming: Option<&str>) -> Result<(), session_service::SessionError> {
//! let store = MemorySaveHandler::new();
//! let mut session = SessionBuilder::new("sess")
//!     .save_handler(store.clone())
//!     .identity(RequestIdentity::from_cookie_value(incoming))
//!     .build();
//!
//! session.start().await?;
//! session.flash("notice", "Profile updated");
//! session.save().await?;
//! # Ok(())
//! # }
//! ```

mod keystore;
mod session;
mod storage;
mod utils;
mod validation;

#[cfg(test)]
mod test_utils;

pub use keystore::{KeyStore, KeyStoreError};

pub use session::{
    CookieOptions, EXPIRES_KEY, ExpiredPolicy, FLASH_NEW_KEY, FLASH_OLD_KEY, FLASH_ONCE_KEY,
    IdentityCommand, IdentityTransport, RequestIdentity, SESSION_COOKIE_DOMAIN,
    SESSION_COOKIE_HTTPONLY, SESSION_COOKIE_PATH, SESSION_COOKIE_SAMESITE, SESSION_COOKIE_SECURE,
    SESSION_MAX_LIFETIME, SESSION_NAME, SameSite, Session, SessionBuilder, SessionConfig,
    SessionError, SessionState, StartOutcome, begin_request, end_request,
};

pub use storage::{
    ExistenceAware, MemorySaveHandler, NullSaveHandler, RedisSaveHandler, SESSION_SAVE_HANDLER_TYPE,
    SESSION_SAVE_HANDLER_URL, SESSION_TABLE, SaveHandler, SaveHandlerFactory, SaveHandlerType,
    SqlSaveHandler, StorageError, WriteStats, collect_garbage,
};

pub use utils::{UtilError, is_valid_session_id, is_valid_session_name};

pub use validation::{
    REMOTE_ADDR_KEY, RemoteAddrValidator, USER_AGENT_KEY, UserAgentValidator, ValidationError,
    Validator, ValidatorChain,
};
