//! Provider wire types and errors.
//!
//! Only the fields the auth flow reads are modelled; everything else in the
//! provider's responses is ignored by serde. Token values are opaque strings
//! and are never inspected.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by provider client operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("provider request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider error {status} ({error_type}): {message}")]
    Api { status: u16, error_type: String, message: String },

    /// The provider response body could not be deserialized.
    #[error("provider response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ProviderError {
    /// HTTP status reported by the provider, if the request got that far.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body returned by the provider on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub error_message: String,
}

// =============================================================================
// ENTITIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub organization_id: String,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub organization_slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRole {
    pub role_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roles: Vec<MemberRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSession {
    pub member_session_id: String,
    pub member_id: String,
    pub organization_id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// How the discovering identity relates to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// e.g. `active_member`, `pending_member`, `eligible_to_join_by_email_domain`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub member: Option<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredOrganization {
    #[serde(default)]
    pub organization: Option<Organization>,
    #[serde(default)]
    pub membership: Option<Membership>,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Result of either discovery authenticate call (OAuth or magic link).
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryAuthenticateResponse {
    pub status_code: u16,
    pub intermediate_session_token: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub discovered_organizations: Vec<DiscoveredOrganization>,
}

/// Any call that ends with a full member session: magic link authenticate,
/// intermediate session exchange, session exchange, organization creation.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub status_code: u16,
    pub session_token: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub member: Option<Member>,
    #[serde(default)]
    pub organization: Option<Organization>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateSessionResponse {
    pub status_code: u16,
    pub member_session: MemberSession,
    pub member: Member,
    pub organization: Organization,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveredOrganizationsResponse {
    pub status_code: u16,
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub discovered_organizations: Vec<DiscoveredOrganization>,
}

/// Response for calls whose only payload is the status.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status_code: u16,
    #[serde(default)]
    pub request_id: String,
}

// =============================================================================
// PROVIDER TRAIT
// =============================================================================

/// OAuth identity providers offered for discovery sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Microsoft,
}

impl OAuthProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "google" => Some(Self::Google),
            "microsoft" => Some(Self::Microsoft),
            _ => None,
        }
    }
}

/// The hosted identity provider, as seen by the route handlers.
///
/// One method per provider call. The production implementation is
/// [`super::StytchClient`]; route tests substitute a recording mock.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Browser-facing URL that starts OAuth discovery with `provider`.
    fn discovery_start_url(&self, provider: OAuthProvider) -> String;

    async fn oauth_discovery_authenticate(&self, token: &str) -> Result<DiscoveryAuthenticateResponse, ProviderError>;

    async fn magic_link_discovery_authenticate(
        &self,
        token: &str,
    ) -> Result<DiscoveryAuthenticateResponse, ProviderError>;

    /// Authenticate an organization-scoped (or invite) magic link.
    async fn magic_link_authenticate(&self, token: &str) -> Result<SessionResponse, ProviderError>;

    async fn send_discovery_email(&self, email_address: &str) -> Result<StatusResponse, ProviderError>;

    /// Exchange an intermediate session token for a session in `organization_id`.
    async fn exchange_intermediate_session(
        &self,
        intermediate_session_token: &str,
        organization_id: &str,
    ) -> Result<SessionResponse, ProviderError>;

    /// Exchange an existing member session for one in another organization.
    async fn exchange_session(&self, session_token: &str, organization_id: &str)
    -> Result<SessionResponse, ProviderError>;

    async fn create_organization_via_discovery(
        &self,
        intermediate_session_token: &str,
        organization_name: &str,
        organization_slug: &str,
    ) -> Result<SessionResponse, ProviderError>;

    async fn authenticate_session(&self, session_token: &str) -> Result<AuthenticateSessionResponse, ProviderError>;

    async fn list_discovered_organizations(
        &self,
        session_token: &str,
    ) -> Result<DiscoveredOrganizationsResponse, ProviderError>;

    /// Revoke every session belonging to `member_id`.
    async fn revoke_member_sessions(&self, member_id: &str) -> Result<StatusResponse, ProviderError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
