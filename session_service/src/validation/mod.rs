//! Session validators run once per session start to detect hijacked or fixated sessions.

mod chain;
mod errors;
mod remote_addr;
mod types;
mod user_agent;

pub use chain::ValidatorChain;
pub use errors::ValidationError;
pub use remote_addr::{REMOTE_ADDR_KEY, RemoteAddrValidator};
pub use types::Validator;
pub use user_agent::{USER_AGENT_KEY, UserAgentValidator};
