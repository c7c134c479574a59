//! Provider credentials and endpoint selection.

use crate::config::{ConfigError, env_parse_strict, required};

pub const TEST_BASE_URL: &str = "https://test.stytch.com";
pub const LIVE_BASE_URL: &str = "https://api.stytch.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectEnv {
    Test,
    Live,
}

impl ProjectEnv {
    #[must_use]
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Test => TEST_BASE_URL,
            Self::Live => LIVE_BASE_URL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StytchConfig {
    pub project_id: String,
    pub secret: String,
    /// Public token; safe to embed in browser-facing URLs.
    pub public_token: String,
    pub env: ProjectEnv,
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl StytchConfig {
    /// Build typed provider config from environment variables.
    ///
    /// Required:
    /// - `STYTCH_PROJECT_ID`
    /// - `STYTCH_SECRET`
    /// - `STYTCH_PUBLIC_TOKEN`
    ///
    /// Optional:
    /// - `STYTCH_PROJECT_ENV`: `test` (default) or `live`
    /// - `STYTCH_API_BASE_URL`: overrides the per-env base URL
    /// - `STYTCH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `STYTCH_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on a missing credential or unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id = required("STYTCH_PROJECT_ID")?;
        let secret = required("STYTCH_SECRET")?;
        let public_token = required("STYTCH_PUBLIC_TOKEN")?;
        let env = parse_project_env(std::env::var("STYTCH_PROJECT_ENV").ok().as_deref())?;
        let base_url = std::env::var("STYTCH_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| env.base_url().to_owned())
            .trim_end_matches('/')
            .to_owned();
        let timeouts = Timeouts {
            request_secs: timeout_secs("STYTCH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: timeout_secs("STYTCH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { project_id, secret, public_token, env, base_url, timeouts })
    }
}

fn timeout_secs(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    let secs = env_parse_strict(var, default)?;
    if secs == 0 {
        return Err(ConfigError::Invalid { var, reason: "must be at least 1 second".into() });
    }
    Ok(secs)
}

pub(crate) fn parse_project_env(raw: Option<&str>) -> Result<ProjectEnv, ConfigError> {
    match raw.map(str::trim).unwrap_or("test") {
        "test" | "" => Ok(ProjectEnv::Test),
        "live" => Ok(ProjectEnv::Live),
        other => Err(ConfigError::Invalid {
            var: "STYTCH_PROJECT_ENV",
            reason: format!("expected 'test' or 'live', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
