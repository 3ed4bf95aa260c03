use std::env;
use std::sync::LazyLock;

pub static SESSION_NAME: LazyLock<String> =
    LazyLock::new(|| env::var("SESSION_NAME").unwrap_or_else(|_| "sess".to_string()));

pub static SESSION_MAX_LIFETIME: LazyLock<u64> = LazyLock::new(|| {
    env::var("SESSION_MAX_LIFETIME")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_LIFETIME) // Default to 30 minutes if not set or invalid
});

pub static SESSION_COOKIE_PATH: LazyLock<String> =
    LazyLock::new(|| env::var("SESSION_COOKIE_PATH").unwrap_or_else(|_| "/".to_string()));

pub static SESSION_COOKIE_DOMAIN: LazyLock<Option<String>> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_DOMAIN")
        .ok()
        .filter(|s| !s.is_empty())
});

pub static SESSION_COOKIE_SAMESITE: LazyLock<SameSite> = LazyLock::new(|| {
    env::var("SESSION_COOKIE_SAMESITE")
        .map(|s| SameSite::parse(&s))
        .unwrap_or_default()
});

pub static SESSION_COOKIE_SECURE: LazyLock<bool> =
    LazyLock::new(|| env_flag("SESSION_COOKIE_SECURE", true));

pub static SESSION_COOKIE_HTTPONLY: LazyLock<bool> =
    LazyLock::new(|| env_flag("SESSION_COOKIE_HTTPONLY", true));

const DEFAULT_MAX_LIFETIME: u64 = 1800;

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Lax,
    #[default]
    Strict,
    None,
}

impl SameSite {
    /// Unknown values fall back to `Strict`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "lax" => Self::Lax,
            "none" => Self::None,
            _ => Self::Strict,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lax => "Lax",
            Self::Strict => "Strict",
            Self::None => "None",
        }
    }
}

/// Cookie attributes handed to the identity transport. The engine does not interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub domain: Option<String>,
    pub same_site: SameSite,
    pub secure: bool,
    pub http_only: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            same_site: SameSite::Strict,
            secure: true,
            http_only: true,
        }
    }
}

impl CookieOptions {
    pub fn from_env() -> Self {
        Self {
            path: SESSION_COOKIE_PATH.clone(),
            domain: SESSION_COOKIE_DOMAIN.clone(),
            same_site: *SESSION_COOKIE_SAMESITE,
            secure: *SESSION_COOKIE_SECURE,
            http_only: *SESSION_COOKIE_HTTPONLY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Alphanumeric session name, also the cookie name
    pub name: String,
    /// Seconds of inactivity after which the session expires
    pub max_lifetime: u64,
    /// Passed to the save handler's `open`
    pub save_location: String,
    pub cookie: CookieOptions,
}

impl SessionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_lifetime: DEFAULT_MAX_LIFETIME,
            save_location: String::new(),
            cookie: CookieOptions::default(),
        }
    }

    pub fn from_env() -> Self {
        Self {
            name: SESSION_NAME.clone(),
            max_lifetime: *SESSION_MAX_LIFETIME,
            save_location: String::new(),
            cookie: CookieOptions::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper function to set an environment variable for the duration of the test
    /// and restore the original value afterward.
    fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();

        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        let result = test();

        match original {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        result
    }

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::new("sess");

        assert_eq!(config.name, "sess");
        assert_eq!(config.max_lifetime, 1800);
        assert_eq!(config.save_location, "");
        assert_eq!(config.cookie.path, "/");
        assert_eq!(config.cookie.domain, None);
        assert_eq!(config.cookie.same_site, SameSite::Strict);
        assert!(config.cookie.secure);
        assert!(config.cookie.http_only);
    }

    #[test]
    fn test_same_site_parse() {
        assert_eq!(SameSite::parse("Lax"), SameSite::Lax);
        assert_eq!(SameSite::parse("none"), SameSite::None);
        assert_eq!(SameSite::parse("STRICT"), SameSite::Strict);
        assert_eq!(SameSite::parse("relaxed"), SameSite::Strict);
        assert_eq!(SameSite::parse(""), SameSite::Strict);
        assert_eq!(SameSite::Lax.as_str(), "Lax");
    }

    #[test]
    #[serial]
    fn test_env_flag() {
        with_env_var("SESSION_TEST_FLAG", Some("false"), || {
            assert!(!env_flag("SESSION_TEST_FLAG", true));
        });
        with_env_var("SESSION_TEST_FLAG", Some("ON"), || {
            assert!(env_flag("SESSION_TEST_FLAG", false));
        });
        with_env_var("SESSION_TEST_FLAG", Some("maybe"), || {
            assert!(env_flag("SESSION_TEST_FLAG", true));
        });
        with_env_var("SESSION_TEST_FLAG", None, || {
            assert!(!env_flag("SESSION_TEST_FLAG", false));
        });
    }

    #[test]
    #[serial]
    fn test_from_env_matches_statics() {
        let config = SessionConfig::from_env();

        assert_eq!(config.name, *SESSION_NAME);
        assert_eq!(config.max_lifetime, *SESSION_MAX_LIFETIME);
        assert_eq!(config.cookie.path, *SESSION_COOKIE_PATH);
        assert_eq!(config.cookie.same_site, *SESSION_COOKIE_SAMESITE);
    }
}
