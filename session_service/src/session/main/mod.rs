mod builder;
mod cycle;
mod engine;
mod expiry;
mod flash;
mod identity;

pub use builder::SessionBuilder;
pub use cycle::{ExpiredPolicy, StartOutcome, begin_request, end_request};
pub use engine::Session;
pub use identity::{IdentityCommand, IdentityTransport, RequestIdentity};
