//! Discovery flow helpers.
//!
//! Pure functions used by the auth routes: decoding the redirect's token-type
//! tag, summarizing discovered organizations for the select-team page, and
//! deriving an organization slug from a display name.

use serde::{Deserialize, Serialize};

use crate::stytch::types::DiscoveredOrganization;

/// Characters replaced with `-` in slugs, in addition to whitespace.
const SLUG_DASHED: &[char] = &['+', '~', '/'];
/// Characters dropped from slugs.
const SLUG_STRIPPED: &[char] = &['(', ')', '.', '`', ',', '%', '·', '\'', '"', '!', '?', '¿', ':', '@', '*'];

/// The `stytch_token_type` tag carried by redirect callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// OAuth discovery (Google / Microsoft).
    DiscoveryOAuth,
    /// Email magic link discovery.
    DiscoveryMagicLink,
    /// Organization-scoped email magic link, including invites.
    MultiTenantMagicLink,
}

impl TokenType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "discovery_oauth" => Some(Self::DiscoveryOAuth),
            "discovery" => Some(Self::DiscoveryMagicLink),
            "multi_tenant_magic_links" => Some(Self::MultiTenantMagicLink),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DiscoveryOAuth => "discovery_oauth",
            Self::DiscoveryMagicLink => "discovery",
            Self::MultiTenantMagicLink => "multi_tenant_magic_links",
        }
    }
}

/// Organization summary stored in the `discovered_orgs` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredOrg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Membership type, e.g. `active_member` or `eligible_to_join_by_email_domain`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<&DiscoveredOrganization> for DiscoveredOrg {
    fn from(org: &DiscoveredOrganization) -> Self {
        Self {
            id: org.organization.as_ref().map(|o| o.organization_id.clone()),
            name: org.organization.as_ref().map(|o| o.organization_name.clone()),
            status: org.membership.as_ref().map(|m| m.kind.clone()),
        }
    }
}

#[must_use]
pub fn summarize(orgs: &[DiscoveredOrganization]) -> Vec<DiscoveredOrg> {
    orgs.iter().map(DiscoveredOrg::from).collect()
}

/// Derive a URL slug from an organization display name.
///
/// Trims and lowercases, turns whitespace and `+ ~ /` into `-`, and drops
/// punctuation the provider rejects in slugs.
#[must_use]
pub fn organization_slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !SLUG_STRIPPED.contains(c))
        .map(|c| if c.is_whitespace() || SLUG_DASHED.contains(&c) { '-' } else { c })
        .collect()
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || normalized.contains(char::is_whitespace) {
        return None;
    }
    Some(normalized.to_owned())
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
