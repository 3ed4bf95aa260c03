use super::errors::ValidationError;
use crate::session::Session;

/// A check run against a freshly loaded session.
///
/// Validators may read and write session data, typically to remember the
/// value they accepted on the first request.
pub trait Validator: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, session: &mut Session) -> Result<(), ValidationError>;
}
