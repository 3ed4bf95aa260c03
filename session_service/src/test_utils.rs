//! Shared test initialization

use std::sync::Once;

/// Loads `.env_test` (falling back to `.env`) once per test binary and removes
/// any SQLite session database left over from a previous run.
pub(crate) fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }

        if let Some(db_path) = std::env::var("SESSION_SAVE_HANDLER_URL")
            .ok()
            .and_then(|url| sqlite_file_path(&url))
        {
            // Missing file is fine
            let _ = std::fs::remove_file(db_path);
        }
    });
}

/// File path of a SQLite URL, or `None` for in-memory and non-SQLite URLs.
fn sqlite_file_path(url: &str) -> Option<String> {
    let path = url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("file:").unwrap_or(path);
    let path = path.strip_prefix("//").unwrap_or(path);
    let path = path.split('?').next()?;

    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Some(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite:/tmp/sessions.db"),
            Some("/tmp/sessions.db".to_string())
        );
        assert_eq!(
            sqlite_file_path("sqlite:./sessions.db"),
            Some("./sessions.db".to_string())
        );
        assert_eq!(
            sqlite_file_path("sqlite:file:/tmp/sessions.db?mode=rwc"),
            Some("/tmp/sessions.db".to_string())
        );
        assert_eq!(
            sqlite_file_path("sqlite:///tmp/sessions.db"),
            Some("/tmp/sessions.db".to_string())
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("sqlite:file::memory:?cache=shared"), None);
        assert_eq!(sqlite_file_path("redis://localhost:6379"), None);
        assert_eq!(sqlite_file_path(""), None);
    }
}
