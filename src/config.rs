//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_FILE: &str = ".catalog/session.json";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// When local session state is cleared on sign-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignOutPolicy {
    /// Clear only after the server acknowledged the logout, or reported the
    /// token as already invalid.
    #[default]
    Acknowledged,
    /// Clear once the logout call completes, whatever its outcome.
    Optimistic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub timeouts: ClientTimeouts,
    pub sign_out_policy: SignOutPolicy,
}

impl ClientConfig {
    /// Config with default timeouts and sign-out policy.
    #[must_use]
    pub fn new(api_base_url: String, session_file: PathBuf) -> Self {
        Self {
            api_base_url: normalize_base_url(&api_base_url),
            session_file,
            timeouts: ClientTimeouts::default(),
            sign_out_policy: SignOutPolicy::default(),
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CATALOG_API_URL`: default `http://127.0.0.1:8000/api`
    /// - `CATALOG_SESSION_FILE`: default `$HOME/.catalog/session.json`
    /// - `CATALOG_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CATALOG_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CATALOG_SIGN_OUT_POLICY`: `acknowledged` (default) or `optimistic`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for an unknown sign-out policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("CATALOG_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let session_file = std::env::var("CATALOG_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());
        let timeouts = ClientTimeouts {
            request_secs: env_parse_u64("CATALOG_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CATALOG_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let sign_out_policy = parse_sign_out_policy(std::env::var("CATALOG_SIGN_OUT_POLICY").ok().as_deref())?;

        Ok(Self { api_base_url: normalize_base_url(&api_base_url), session_file, timeouts, sign_out_policy })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_session_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_SESSION_FILE)
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_sign_out_policy(raw: Option<&str>) -> Result<SignOutPolicy, ConfigError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref().unwrap_or("acknowledged") {
        "acknowledged" | "ack" => Ok(SignOutPolicy::Acknowledged),
        "optimistic" => Ok(SignOutPolicy::Optimistic),
        other => Err(ConfigError::Parse(format!(
            "unknown CATALOG_SIGN_OUT_POLICY '{other}' (expected 'acknowledged' or 'optimistic')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
