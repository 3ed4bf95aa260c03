mod config;
mod errors;
mod main;
mod types;

pub use config::{
    CookieOptions, SESSION_COOKIE_DOMAIN, SESSION_COOKIE_HTTPONLY, SESSION_COOKIE_PATH,
    SESSION_COOKIE_SAMESITE, SESSION_COOKIE_SECURE, SESSION_MAX_LIFETIME, SESSION_NAME, SameSite,
    SessionConfig,
};
pub use errors::SessionError;
pub use main::{
    ExpiredPolicy, IdentityCommand, IdentityTransport, RequestIdentity, Session, SessionBuilder,
    StartOutcome, begin_request, end_request,
};
pub use types::{EXPIRES_KEY, FLASH_NEW_KEY, FLASH_OLD_KEY, FLASH_ONCE_KEY, SessionState};
