//! Recording `IdentityProvider` for route tests.

use std::sync::Mutex;

use super::client::discovery_start_url;
use super::types::*;

const MOCK_BASE_URL: &str = "https://test.stytch.com";
const MOCK_PUBLIC_TOKEN: &str = "public-token-test-1";

pub struct MockProvider {
    calls: Mutex<Vec<(&'static str, Vec<String>)>>,
    failing: Vec<&'static str>,
    orgs: Vec<DiscoveredOrganization>,
    exchange_status: u16,
    created_org: Option<Organization>,
}

impl MockProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Vec::new(),
            orgs: vec![
                mock_org("org-1", "Acme", "active_member"),
                mock_org("org-2", "Globex", "eligible_to_join_by_email_domain"),
            ],
            exchange_status: 200,
            created_org: Some(Organization {
                organization_id: "org-new".into(),
                organization_name: "Acme Corp".into(),
                organization_slug: "acme-corp".into(),
            }),
        }
    }

    /// Make the named methods return a 400 provider error.
    #[must_use]
    pub fn failing(mut self, methods: &[&'static str]) -> Self {
        self.failing.extend_from_slice(methods);
        self
    }

    /// `status_code` reported by a successful-looking session exchange.
    #[must_use]
    pub fn exchange_status(mut self, status: u16) -> Self {
        self.exchange_status = status;
        self
    }

    #[must_use]
    pub fn without_created_org(mut self) -> Self {
        self.created_org = None;
        self
    }

    /// Names of provider methods invoked, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().iter().map(|(name, _)| *name).collect()
    }

    /// Arguments of every invocation of `method`.
    pub fn args(&self, method: &str) -> Vec<Vec<String>> {
        self.lock()
            .iter()
            .filter(|(name, _)| *name == method)
            .map(|(_, args)| args.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(&'static str, Vec<String>)>> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, method: &'static str, args: &[&str]) -> Result<(), ProviderError> {
        self.lock()
            .push((method, args.iter().map(ToString::to_string).collect()));
        if self.failing.contains(&method) {
            return Err(ProviderError::Api {
                status: 400,
                error_type: "mock_failure".into(),
                message: format!("{method} failed"),
            });
        }
        Ok(())
    }

    fn discovery(&self, token: &str) -> DiscoveryAuthenticateResponse {
        DiscoveryAuthenticateResponse {
            status_code: 200,
            intermediate_session_token: format!("ist-from-{token}"),
            email_address: "ada@example.com".into(),
            discovered_organizations: self.orgs.clone(),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[must_use]
pub fn mock_org(id: &str, name: &str, kind: &str) -> DiscoveredOrganization {
    DiscoveredOrganization {
        organization: Some(Organization {
            organization_id: id.into(),
            organization_name: name.into(),
            organization_slug: name.to_lowercase(),
        }),
        membership: Some(Membership { kind: kind.into(), member: None }),
    }
}

fn session(status_code: u16, session_token: String, organization: Option<Organization>) -> SessionResponse {
    SessionResponse { status_code, session_token, member_id: "member-1".into(), member: None, organization }
}

fn status() -> StatusResponse {
    StatusResponse { status_code: 200, request_id: "request-id-mock".into() }
}

#[async_trait::async_trait]
impl IdentityProvider for MockProvider {
    fn discovery_start_url(&self, provider: OAuthProvider) -> String {
        discovery_start_url(MOCK_BASE_URL, MOCK_PUBLIC_TOKEN, provider)
    }

    async fn oauth_discovery_authenticate(&self, token: &str) -> Result<DiscoveryAuthenticateResponse, ProviderError> {
        self.record("oauth_discovery_authenticate", &[token])?;
        Ok(self.discovery(token))
    }

    async fn magic_link_discovery_authenticate(
        &self,
        token: &str,
    ) -> Result<DiscoveryAuthenticateResponse, ProviderError> {
        self.record("magic_link_discovery_authenticate", &[token])?;
        Ok(self.discovery(token))
    }

    async fn magic_link_authenticate(&self, token: &str) -> Result<SessionResponse, ProviderError> {
        self.record("magic_link_authenticate", &[token])?;
        Ok(session(200, format!("session-from-{token}"), None))
    }

    async fn send_discovery_email(&self, email_address: &str) -> Result<StatusResponse, ProviderError> {
        self.record("send_discovery_email", &[email_address])?;
        Ok(status())
    }

    async fn exchange_intermediate_session(
        &self,
        intermediate_session_token: &str,
        organization_id: &str,
    ) -> Result<SessionResponse, ProviderError> {
        self.record("exchange_intermediate_session", &[intermediate_session_token, organization_id])?;
        Ok(session(200, format!("session-{organization_id}"), None))
    }

    async fn exchange_session(
        &self,
        session_token: &str,
        organization_id: &str,
    ) -> Result<SessionResponse, ProviderError> {
        self.record("exchange_session", &[session_token, organization_id])?;
        Ok(session(self.exchange_status, format!("session-{organization_id}"), None))
    }

    async fn create_organization_via_discovery(
        &self,
        intermediate_session_token: &str,
        organization_name: &str,
        organization_slug: &str,
    ) -> Result<SessionResponse, ProviderError> {
        self.record(
            "create_organization_via_discovery",
            &[intermediate_session_token, organization_name, organization_slug],
        )?;
        Ok(session(200, "session-new-org".into(), self.created_org.clone()))
    }

    async fn authenticate_session(&self, session_token: &str) -> Result<AuthenticateSessionResponse, ProviderError> {
        self.record("authenticate_session", &[session_token])?;
        Ok(AuthenticateSessionResponse {
            status_code: 200,
            member_session: MemberSession {
                member_session_id: "member-session-1".into(),
                member_id: "member-1".into(),
                organization_id: "org-1".into(),
                roles: vec!["stytch_member".into(), "stytch_admin".into()],
                expires_at: None,
            },
            member: Member {
                member_id: "member-1".into(),
                organization_id: "org-1".into(),
                email_address: "ada@example.com".into(),
                name: "Ada".into(),
                roles: vec![MemberRole { role_id: "stytch_admin".into() }],
            },
            organization: Organization {
                organization_id: "org-1".into(),
                organization_name: "Acme".into(),
                organization_slug: "acme".into(),
            },
        })
    }

    async fn list_discovered_organizations(
        &self,
        session_token: &str,
    ) -> Result<DiscoveredOrganizationsResponse, ProviderError> {
        self.record("list_discovered_organizations", &[session_token])?;
        Ok(DiscoveredOrganizationsResponse {
            status_code: 200,
            email_address: "ada@example.com".into(),
            discovered_organizations: self.orgs.clone(),
        })
    }

    async fn revoke_member_sessions(&self, member_id: &str) -> Result<StatusResponse, ProviderError> {
        self.record("revoke_member_sessions", &[member_id])?;
        Ok(status())
    }
}
