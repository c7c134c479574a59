//! Application configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present) and then builds [`AppConfig`] once at
//! startup. Provider credentials live in [`crate::stytch::config`]; this
//! module owns the HTTP-facing settings: public app URL, listen port, cookie
//! policy and CORS.

use crate::stytch::config::StytchConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SESSION_DURATION_MINUTES: i64 = 60;
/// One year; cookie `Max-Age` beyond this is meaningless to browsers.
pub const MAX_SESSION_DURATION_MINUTES: i64 = 525_600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Cookie attributes shared by every cookie the auth routes set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub max_age_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Public origin of the dashboard, e.g. `http://localhost:4321`.
    pub app_url: String,
    pub port: u16,
    pub cookies: CookiePolicy,
    pub cors_origin: String,
    /// Directory holding the built dashboard, served as a fallback.
    pub static_dir: Option<String>,
    pub stytch: StytchConfig,
}

impl AppConfig {
    /// Build config from environment variables.
    ///
    /// Required: `APP_URL` plus the provider credentials read by
    /// [`StytchConfig::from_env`].
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: inferred from `APP_URL` scheme when absent
    /// - `SESSION_DURATION_MINUTES`: default 60
    /// - `CORS_ALLOWED_ORIGIN`: defaults to `APP_URL`
    /// - `STATIC_DIR`: no static serving when absent
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_url = required("APP_URL")?.trim_end_matches('/').to_owned();
        if !app_url.starts_with("http://") && !app_url.starts_with("https://") {
            return Err(ConfigError::Invalid { var: "APP_URL", reason: format!("not an http(s) url: {app_url}") });
        }

        let port = env_parse_strict("PORT", DEFAULT_PORT)?;
        let secure = env_bool("COOKIE_SECURE").unwrap_or_else(|| app_url.starts_with("https://"));
        let max_age_minutes = env_parse_strict("SESSION_DURATION_MINUTES", DEFAULT_SESSION_DURATION_MINUTES)?;
        if !(1..=MAX_SESSION_DURATION_MINUTES).contains(&max_age_minutes) {
            return Err(ConfigError::Invalid {
                var: "SESSION_DURATION_MINUTES",
                reason: format!("must be between 1 and {MAX_SESSION_DURATION_MINUTES}, got {max_age_minutes}"),
            });
        }

        let cors_origin = std::env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| app_url.clone());
        let static_dir = std::env::var("STATIC_DIR").ok().filter(|v| !v.trim().is_empty());
        let stytch = StytchConfig::from_env()?;

        Ok(Self { app_url, port, cookies: CookiePolicy { secure, max_age_minutes }, cors_origin, static_dir, stytch })
    }

    /// Absolute URL for a path on the dashboard origin.
    #[must_use]
    pub fn app_path(&self, path: &str) -> String {
        format!("{}{path}", self.app_url)
    }
}

pub(crate) fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// Parse an optional variable, failing on a present-but-malformed value.
pub(crate) fn env_parse_strict<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::Invalid { var: key, reason: e.to_string() }),
        Err(_) => Ok(default),
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
