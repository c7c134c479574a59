//! B2B REST API client.
//!
//! Thin HTTP wrapper: every call is a JSON `POST` under `/v1/b2b/` with basic
//! auth. Pure parsing in `parse_response` for testability.

use std::time::Duration;

use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::config::StytchConfig;
use super::types::{
    ApiErrorBody, AuthenticateSessionResponse, DiscoveredOrganizationsResponse, DiscoveryAuthenticateResponse,
    IdentityProvider, OAuthProvider, ProviderError, SessionResponse, StatusResponse,
};

// =============================================================================
// CLIENT
// =============================================================================

pub struct StytchClient {
    http: reqwest::Client,
    config: StytchConfig,
}

impl StytchClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: StytchConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ProviderError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.project_id, Some(&self.config.secret))
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        tracing::debug!(%path, status, "provider call");
        parse_response(status, &text)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StytchClient {
    fn discovery_start_url(&self, provider: OAuthProvider) -> String {
        discovery_start_url(&self.config.base_url, &self.config.public_token, provider)
    }

    async fn oauth_discovery_authenticate(&self, token: &str) -> Result<DiscoveryAuthenticateResponse, ProviderError> {
        self.post(
            "/v1/b2b/oauth/discovery/authenticate",
            &serde_json::json!({ "discovery_oauth_token": token }),
        )
        .await
    }

    async fn magic_link_discovery_authenticate(
        &self,
        token: &str,
    ) -> Result<DiscoveryAuthenticateResponse, ProviderError> {
        self.post(
            "/v1/b2b/magic_links/discovery/authenticate",
            &serde_json::json!({ "discovery_magic_links_token": token }),
        )
        .await
    }

    async fn magic_link_authenticate(&self, token: &str) -> Result<SessionResponse, ProviderError> {
        self.post("/v1/b2b/magic_links/authenticate", &serde_json::json!({ "magic_links_token": token }))
            .await
    }

    async fn send_discovery_email(&self, email_address: &str) -> Result<StatusResponse, ProviderError> {
        self.post(
            "/v1/b2b/magic_links/email/discovery/send",
            &serde_json::json!({ "email_address": email_address }),
        )
        .await
    }

    async fn exchange_intermediate_session(
        &self,
        intermediate_session_token: &str,
        organization_id: &str,
    ) -> Result<SessionResponse, ProviderError> {
        self.post(
            "/v1/b2b/discovery/intermediate_sessions/exchange",
            &serde_json::json!({
                "intermediate_session_token": intermediate_session_token,
                "organization_id": organization_id,
            }),
        )
        .await
    }

    async fn exchange_session(
        &self,
        session_token: &str,
        organization_id: &str,
    ) -> Result<SessionResponse, ProviderError> {
        self.post(
            "/v1/b2b/sessions/exchange",
            &serde_json::json!({
                "session_token": session_token,
                "organization_id": organization_id,
            }),
        )
        .await
    }

    async fn create_organization_via_discovery(
        &self,
        intermediate_session_token: &str,
        organization_name: &str,
        organization_slug: &str,
    ) -> Result<SessionResponse, ProviderError> {
        self.post(
            "/v1/b2b/discovery/organizations/create",
            &serde_json::json!({
                "intermediate_session_token": intermediate_session_token,
                "organization_name": organization_name,
                "organization_slug": organization_slug,
            }),
        )
        .await
    }

    async fn authenticate_session(&self, session_token: &str) -> Result<AuthenticateSessionResponse, ProviderError> {
        self.post("/v1/b2b/sessions/authenticate", &serde_json::json!({ "session_token": session_token }))
            .await
    }

    async fn list_discovered_organizations(
        &self,
        session_token: &str,
    ) -> Result<DiscoveredOrganizationsResponse, ProviderError> {
        self.post("/v1/b2b/discovery/organizations", &serde_json::json!({ "session_token": session_token }))
            .await
    }

    async fn revoke_member_sessions(&self, member_id: &str) -> Result<StatusResponse, ProviderError> {
        self.post("/v1/b2b/sessions/revoke", &serde_json::json!({ "member_id": member_id }))
            .await
    }
}

// =============================================================================
// URLS
// =============================================================================

/// Build the public OAuth discovery start URL for `provider`.
pub(crate) fn discovery_start_url(base_url: &str, public_token: &str, provider: OAuthProvider) -> String {
    let path = format!("/v1/b2b/public/oauth/{}/discovery/start", provider.as_str());
    match Url::parse(base_url).and_then(|base| base.join(&path)) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("public_token", public_token);
            url.to_string()
        }
        // Unparsable base URL: concatenate as-is.
        Err(_) => format!("{base_url}{path}?public_token={public_token}"),
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response<R: DeserializeOwned>(status: u16, body: &str) -> Result<R, ProviderError> {
    if !(200..300).contains(&status) {
        return Err(parse_error(status, body));
    }
    serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))
}

fn parse_error(status: u16, body: &str) -> ProviderError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => ProviderError::Api {
            status: if err.status_code == 0 { status } else { err.status_code },
            error_type: err.error_type,
            message: if err.request_id.is_empty() {
                err.error_message
            } else {
                format!("{} (request {})", err.error_message, err.request_id)
            },
        },
        Err(_) => ProviderError::Api { status, error_type: "unknown".into(), message: body.to_owned() },
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
