//! Auth routes — discovery sign-in, team selection, session exchange, logout.
//!
//! Every handler is a straight call chain: read cookies or params, make one
//! provider call, set or clear cookies, redirect to a fixed dashboard path.

use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::error::{AppError, found};
use crate::services::cookies::{self, DISCOVERED_ORGS_COOKIE, INTERMEDIATE_COOKIE, SESSION_COOKIE};
use crate::services::discovery::{self, TokenType};
use crate::state::AppState;
use crate::stytch::types::AuthenticateSessionResponse;
use crate::stytch::{OAuthProvider, ProviderError};

const DASHBOARD_PATH: &str = "/dashboard";
const SELECT_TEAM_PATH: &str = "/dashboard/select-team";
const LOGIN_PATH: &str = "/dashboard/login";
const LOGOUT_PATH: &str = "/auth/logout";

fn login_redirect(state: &AppState, reason: &'static str) -> AppError {
    AppError::RedirectToLogin { location: state.config.app_path(LOGIN_PATH), reason }
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Member whose `stytch_session` cookie the provider accepted.
/// Use as a handler parameter to require a live session.
pub struct AuthMember {
    pub session: AuthenticateSessionResponse,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthMember
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = cookies::value(&jar, SESSION_COOKIE).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = AppState::from_ref(state);
        let session = app_state
            .provider
            .authenticate_session(token)
            .await
            .map_err(|e| match e.status_code() {
                Some(400..=499) => StatusCode::UNAUTHORIZED,
                _ => {
                    tracing::error!(error = %e, "session authenticate failed");
                    StatusCode::BAD_GATEWAY
                }
            })?;

        Ok(Self { session, token: token.to_owned() })
    }
}

// =============================================================================
// DISCOVERY
// =============================================================================

/// `GET /auth/discovery/{method}` — hand the browser to the provider's OAuth
/// discovery start page for Google or Microsoft.
pub async fn discovery_start(State(state): State<AppState>, Path(method): Path<String>) -> Result<Response, AppError> {
    let provider = OAuthProvider::parse(&method).ok_or_else(|| AppError::BadRequest(format!("method {method} is unsupported")))?;
    Ok(found(&state.provider.discovery_start_url(provider)))
}

#[derive(Deserialize)]
pub struct DiscoveryEmailRequest {
    email_address: String,
}

/// `POST /auth/discovery/email` — email a discovery magic link.
pub async fn discovery_email(
    State(state): State<AppState>,
    Json(body): Json<DiscoveryEmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = discovery::normalize_email(&body.email_address)
        .ok_or_else(|| AppError::BadRequest("invalid email address".into()))?;

    state.provider.send_discovery_email(&email).await?;

    Ok(Json(serde_json::json!({ "message": "Please check your email" })))
}

// =============================================================================
// REDIRECT CALLBACK
// =============================================================================

#[derive(Deserialize)]
pub struct RedirectQuery {
    stytch_token_type: Option<String>,
    token: Option<String>,
}

/// `GET /auth/redirect` — landing point for every provider callback.
///
/// Organization-scoped magic links produce a full session straight away.
/// Discovery tokens produce an intermediate token plus the list of
/// organizations the member may enter; the select-team page picks one.
pub async fn redirect(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RedirectQuery>,
) -> Result<Response, AppError> {
    let tag = params.stytch_token_type.unwrap_or_default();
    let Some(token_type) = TokenType::parse(&tag) else {
        tracing::warn!(token_type = %tag, "unsupported token type");
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, format!("unknown token type {tag}")).into_response());
    };
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("missing token".into()))?;
    let policy = state.config.cookies;

    let discovered = match token_type {
        TokenType::DiscoveryOAuth => state.provider.oauth_discovery_authenticate(&token).await?,
        TokenType::DiscoveryMagicLink => state.provider.magic_link_discovery_authenticate(&token).await?,
        TokenType::MultiTenantMagicLink => {
            let session = state.provider.magic_link_authenticate(&token).await?;
            tracing::info!(member_id = %session.member_id, "magic link session created");
            let jar = jar.add(cookies::issue(SESSION_COOKIE, session.session_token, policy));
            return Ok((jar, Redirect::temporary(&state.config.app_path(DASHBOARD_PATH))).into_response());
        }
    };

    let orgs = discovery::summarize(&discovered.discovered_organizations);
    tracing::info!(token_type = token_type.as_str(), orgs = orgs.len(), "discovery authenticated");

    let jar = jar
        .add(cookies::issue(INTERMEDIATE_COOKIE, discovered.intermediate_session_token, policy))
        .add(cookies::issue(DISCOVERED_ORGS_COOKIE, cookies::encode_discovered_orgs(&orgs), policy));
    Ok((jar, Redirect::temporary(&state.config.app_path(SELECT_TEAM_PATH))).into_response())
}

// =============================================================================
// ORGANIZATION SELECTION
// =============================================================================

#[derive(Deserialize)]
pub struct SelectTeamQuery {
    org_id: Option<String>,
}

/// `GET /auth/select-team` — trade the intermediate token for a session in
/// the chosen organization.
pub async fn select_team(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<SelectTeamQuery>,
) -> Result<Response, AppError> {
    let intermediate =
        cookies::value(&jar, INTERMEDIATE_COOKIE).ok_or_else(|| login_redirect(&state, "no intermediate token"))?;
    let org_id = params
        .org_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| login_redirect(&state, "no organization selected"))?;

    let session = state
        .provider
        .exchange_intermediate_session(intermediate, &org_id)
        .await?;
    tracing::info!(organization_id = %org_id, "intermediate session exchanged");

    let policy = state.config.cookies;
    let jar = jar
        .add(cookies::issue(SESSION_COOKIE, session.session_token, policy))
        .add(cookies::expire(INTERMEDIATE_COOKIE, policy))
        .add(cookies::expire(DISCOVERED_ORGS_COOKIE, policy));
    Ok((jar, Redirect::to(&state.config.app_path(DASHBOARD_PATH))).into_response())
}

#[derive(Deserialize)]
pub struct SwitchTeamForm {
    organization_id: Option<String>,
}

/// `POST /auth/switch-team` — move the current session to another
/// organization without re-authenticating.
///
/// Choosing `new`, or submitting no organization, logs out so the member can
/// start discovery again. If the provider refuses the exchange (e.g. the
/// target org requires a different auth method) the member also has to log
/// in again.
pub async fn switch_team(State(state): State<AppState>, jar: CookieJar, Form(form): Form<SwitchTeamForm>) -> Response {
    let Some(organization_id) = form.organization_id.filter(|id| !id.is_empty() && id != "new") else {
        return found(LOGOUT_PATH);
    };
    let Some(session_token) = cookies::value(&jar, SESSION_COOKIE) else {
        return found(LOGOUT_PATH);
    };

    let result = state
        .provider
        .exchange_session(session_token, &organization_id)
        .await;

    let session = match result {
        Ok(session) if session.status_code == 200 => session,
        Ok(session) => {
            tracing::warn!(status = session.status_code, %organization_id, "session exchange refused");
            return found(LOGOUT_PATH);
        }
        Err(e) => {
            tracing::warn!(error = %e, %organization_id, "session exchange failed");
            return found(LOGOUT_PATH);
        }
    };

    let jar = jar.add(cookies::issue(SESSION_COOKIE, session.session_token, state.config.cookies));
    (jar, Redirect::to(&state.config.app_path(DASHBOARD_PATH))).into_response()
}

#[derive(Deserialize)]
pub struct RegisterForm {
    organization: String,
}

/// `POST /auth/register` — create a new organization from the discovery
/// flow, exchanging the intermediate token in the same call.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let name = form.organization.trim();
    let slug = discovery::organization_slug(name);
    if name.is_empty() || slug.is_empty() {
        return Err(AppError::BadRequest("organization name is required".into()));
    }
    let intermediate =
        cookies::value(&jar, INTERMEDIATE_COOKIE).ok_or_else(|| login_redirect(&state, "no intermediate token"))?;

    let created = state
        .provider
        .create_organization_via_discovery(intermediate, name, &slug)
        .await?;

    let organization_id = created.organization.as_ref().map(|o| o.organization_id.as_str());
    let Some(organization_id) = organization_id.filter(|_| created.status_code == 200) else {
        return Err(AppError::Internal("Unable to create organization".into()));
    };
    tracing::info!(%organization_id, %slug, "organization created");

    let policy = state.config.cookies;
    let jar = jar
        .add(cookies::expire(INTERMEDIATE_COOKIE, policy))
        .add(cookies::expire(DISCOVERED_ORGS_COOKIE, policy))
        .add(cookies::issue(SESSION_COOKIE, created.session_token, policy));
    Ok((jar, Redirect::to(&state.config.app_path(DASHBOARD_PATH))).into_response())
}

// =============================================================================
// LOGOUT
// =============================================================================

/// `GET /auth/logout` — revoke every session of the current member and clear
/// auth cookies. Always ends on the login page, even without a valid session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = cookies::value(&jar, SESSION_COOKIE) {
        match state.provider.authenticate_session(token).await {
            Ok(auth) => {
                let member_id = auth.member.member_id;
                match state.provider.revoke_member_sessions(&member_id).await {
                    Ok(_) => tracing::info!(%member_id, "member sessions revoked"),
                    Err(e) => tracing::warn!(error = %e, %member_id, "session revoke failed"),
                }
            }
            Err(e) => log_stale_session(&e),
        }
    }

    let policy = state.config.cookies;
    let jar = jar
        .add(cookies::expire(SESSION_COOKIE, policy))
        .add(cookies::expire(INTERMEDIATE_COOKIE, policy))
        .add(cookies::expire(DISCOVERED_ORGS_COOKIE, policy));
    (jar, found(&state.config.app_path(LOGIN_PATH))).into_response()
}

fn log_stale_session(e: &ProviderError) {
    if matches!(e.status_code(), Some(400..=499)) {
        tracing::debug!(error = %e, "logout with stale session");
    } else {
        tracing::warn!(error = %e, "session authenticate failed during logout");
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
