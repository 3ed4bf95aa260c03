/// Expiry mark: unix time at or after which the payload is stale.
pub const EXPIRES_KEY: &str = "_session_expires";

/// Keys flashed during the current cycle.
pub const FLASH_NEW_KEY: &str = "_session_flash.new";

/// Keys flashed one cycle ago, purged on the next save.
pub const FLASH_OLD_KEY: &str = "_session_flash.old";

/// Keys deleted on their first read.
pub const FLASH_ONCE_KEY: &str = "_session_flash_once";

/// Lifecycle of one session engine within a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    Active,
    Closed,
    Destroyed,
}
