//! Auth cookies.
//!
//! ARCHITECTURE
//! ============
//! The browser carries all auth state: the member session token, the
//! intermediate token issued by discovery, and the summary of discovered
//! organizations. Values are opaque provider tokens, except the org summary,
//! which is JSON encoded as unpadded URL-safe base64 so it survives cookie
//! value restrictions on quotes and commas.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use time::Duration;

use super::discovery::DiscoveredOrg;
use crate::config::CookiePolicy;

pub const SESSION_COOKIE: &str = "stytch_session";
pub const INTERMEDIATE_COOKIE: &str = "intermediate_token";
pub const DISCOVERED_ORGS_COOKIE: &str = "discovered_orgs";
/// Browsers drop cookies whose name, value and attributes exceed 4096 bytes;
/// this leaves room for the name and attributes.
pub const MAX_COOKIE_VALUE_BYTES: usize = 4000;

fn base(name: &'static str, value: String, policy: CookiePolicy) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(policy.secure)
        .build()
}

/// Cookie carrying `value`, expiring with the configured session duration.
#[must_use]
pub fn issue(name: &'static str, value: impl Into<String>, policy: CookiePolicy) -> Cookie<'static> {
    let mut cookie = base(name, value.into(), policy);
    cookie.set_max_age(Duration::minutes(policy.max_age_minutes));
    cookie
}

/// Empty cookie with `Max-Age=0`, instructing the browser to drop `name`.
#[must_use]
pub fn expire(name: &'static str, policy: CookiePolicy) -> Cookie<'static> {
    let mut cookie = base(name, String::new(), policy);
    cookie.set_max_age(Duration::ZERO);
    cookie
}

/// Non-empty value of `name` in `jar`, if any.
#[must_use]
pub fn value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(Cookie::value).filter(|v| !v.is_empty())
}

#[must_use]
pub fn encode_discovered_orgs(orgs: &[DiscoveredOrg]) -> String {
    // Serializing plain Option<String> fields cannot fail.
    let json = serde_json::to_vec(orgs).unwrap_or_default();
    let encoded = URL_SAFE_NO_PAD.encode(json);
    if exceeds_cookie_limit(&encoded) {
        tracing::warn!(
            orgs = orgs.len(),
            bytes = encoded.len(),
            limit = MAX_COOKIE_VALUE_BYTES,
            "discovered_orgs cookie is likely too large for the browser to keep"
        );
    }
    encoded
}

/// Whether a cookie value is large enough that browsers may silently drop it.
#[must_use]
pub fn exceeds_cookie_limit(value: &str) -> bool {
    value.len() > MAX_COOKIE_VALUE_BYTES
}

/// Decode the `discovered_orgs` cookie; `None` if it is absent or malformed.
#[must_use]
pub fn decode_discovered_orgs(raw: &str) -> Option<Vec<DiscoveredOrg>> {
    let bytes = URL_SAFE_NO_PAD.decode(raw.trim()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
#[path = "cookies_test.rs"]
mod tests;
