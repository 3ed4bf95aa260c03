//! Start and save around one unit of work, with an explicit policy for expired sessions.

use crate::session::errors::SessionError;

use super::engine::Session;

/// What to do when a session turns out to be expired at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiredPolicy {
    /// Return [`SessionError::Expired`] to the caller
    Propagate,
    /// Destroy the session and carry on without one
    #[default]
    Destroy,
    /// Destroy the session and start a fresh one with a new id
    DestroyAndRestart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// The session had expired and was destroyed
    Destroyed,
    /// The session had expired and was replaced by a new one
    Restarted,
}

/// Start `session` for a request. Start and validation errors are returned as
/// they are; only expiry is subject to `policy`.
pub async fn begin_request(
    session: &mut Session,
    policy: ExpiredPolicy,
) -> Result<StartOutcome, SessionError> {
    match session.start().await {
        Ok(()) => Ok(StartOutcome::Started),
        Err(SessionError::Expired) => match policy {
            ExpiredPolicy::Propagate => Err(SessionError::Expired),
            ExpiredPolicy::Destroy => {
                session.destroy().await?;
                tracing::info!(name = session.name(), "Expired session destroyed");
                Ok(StartOutcome::Destroyed)
            }
            ExpiredPolicy::DestroyAndRestart => {
                session.destroy().await?;
                session.start().await?;
                tracing::info!(name = session.name(), "Expired session replaced");
                Ok(StartOutcome::Restarted)
            }
        },
        Err(e) => Err(e),
    }
}

pub async fn end_request(session: &mut Session) -> Result<(), SessionError> {
    session.save().await
}
