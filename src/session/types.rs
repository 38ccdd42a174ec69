use crate::env;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Session configuration supplied once at construction.
///
/// Cookie attributes (`cookie_lifetime_secs` through `domain`) are forwarded
/// to the cookie transport; `use_strict_mode`, `gc_maxlifetime_secs`, and
/// `use_cookies_only` are forwarded to the store; `timeout_secs` drives the
/// inactivity check performed by the manager itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie lifetime in seconds, 0 = session-only cookie.
    pub cookie_lifetime_secs: i64,
    /// Send the cookie over HTTPS only.
    pub secure: bool,
    /// Hide the cookie from client-side scripts.
    pub http_only: bool,
    /// SameSite policy for the cookie.
    pub same_site: SameSite,
    /// Cookie path scope.
    pub path: String,
    /// Cookie domain scope, empty = host-only.
    pub domain: String,
    /// Reject client-presented identifiers unknown to the store.
    pub use_strict_mode: bool,
    /// Store-side garbage collection horizon in seconds.
    pub gc_maxlifetime_secs: i64,
    /// Accept identifiers from cookies only (never from URLs or bodies).
    pub use_cookies_only: bool,
    /// Inactivity window in seconds before a session is reset.
    pub timeout_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_lifetime_secs: 0,
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            path: "/".to_string(),
            domain: String::new(),
            use_strict_mode: true,
            gc_maxlifetime_secs: env::DEFAULT_GC_MAXLIFETIME_SECS,
            use_cookies_only: true,
            timeout_secs: env::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SessionConfig {
    /// Load from a TOML file; missing keys fall back to defaults.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let content = std::fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SessionError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SessionError::Internal(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The cookie attribute subset of this configuration.
    pub fn cookie_params(&self) -> CookieParams {
        CookieParams {
            lifetime_secs: self.cookie_lifetime_secs,
            path: self.path.clone(),
            domain: self.domain.clone(),
            secure: self.secure,
            http_only: self.http_only,
            same_site: self.same_site,
        }
    }
}

/// Cookie attributes applied to every cookie the transport emits, including
/// the expired removal cookie written on destruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieParams {
    pub lifetime_secs: i64,
    pub path: String,
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl Default for CookieParams {
    fn default() -> Self {
        SessionConfig::default().cookie_params()
    }
}

/// SameSite cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// Lifecycle state reported by a session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session is bound.
    Inactive,
    /// A session is bound and usable.
    Active,
    /// The store cannot provide sessions at all.
    Disabled,
}

/// Session errors.
///
/// Timeout and fingerprint violations are deliberately absent: those are
/// handled by silent reset, not surfaced as errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store is disabled")]
    StoreDisabled,
    #[error("session store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("invalid session configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("internal store failure: {0}")]
    Internal(String),
}
