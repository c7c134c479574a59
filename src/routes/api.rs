//! Session-aware JSON endpoints for the dashboard shell.
//!
//! The shell only renders member pages when `/api/session` succeeds, and
//! fills the organization switcher from `/api/organizations`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use super::auth::AuthMember;
use crate::services::cookies::{self, DISCOVERED_ORGS_COOKIE};
use crate::services::discovery::{self, DiscoveredOrg};
use crate::state::AppState;
use crate::stytch::types::{Member, Organization};

const ADMIN_ROLE: &str = "stytch_admin";

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub member: Member,
    pub organization: Organization,
    pub roles: Vec<String>,
    pub is_admin: bool,
}

/// `GET /api/session` — current member, organization and roles.
pub async fn session(auth: AuthMember) -> Json<SessionView> {
    let AuthMember { session, .. } = auth;
    let roles = session.member_session.roles;
    let is_admin = roles.iter().any(|r| r == ADMIN_ROLE);
    Json(SessionView { member: session.member, organization: session.organization, roles, is_admin })
}

#[derive(Debug, Serialize)]
pub struct SwitcherEntry {
    #[serde(flatten)]
    pub org: DiscoveredOrg,
    /// `true` for the organization the current session belongs to.
    pub current: bool,
}

/// `GET /api/organizations` — organizations the member can switch to.
pub async fn organizations(
    State(state): State<AppState>,
    auth: AuthMember,
) -> Result<Json<Vec<SwitcherEntry>>, StatusCode> {
    let resp = state
        .provider
        .list_discovered_organizations(&auth.token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "organization list failed");
            StatusCode::BAD_GATEWAY
        })?;

    let current = auth.session.organization.organization_id.as_str();
    let entries = discovery::summarize(&resp.discovered_organizations)
        .into_iter()
        .map(|org| {
            let is_current = org.id.as_deref() == Some(current);
            SwitcherEntry { org, current: is_current }
        })
        .collect();
    Ok(Json(entries))
}

/// `GET /api/discovery/organizations` — organizations found by the last
/// discovery sign-in, read back from the `discovered_orgs` cookie.
pub async fn discovered_organizations(jar: CookieJar) -> Json<Vec<DiscoveredOrg>> {
    let orgs = cookies::value(&jar, DISCOVERED_ORGS_COOKIE)
        .and_then(cookies::decode_discovered_orgs)
        .unwrap_or_default();
    Json(orgs)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
