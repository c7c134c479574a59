//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the auth flow under `/auth`, the shell's JSON endpoints under
//! `/api`, and a health check. When `STATIC_DIR` is set the built dashboard
//! is served as the fallback, with `index.html` answering client-side routes.

pub mod api;
pub mod auth;

use std::path::Path;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);
    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .route("/auth/discovery/email", post(auth::discovery_email))
        .route("/auth/discovery/{method}", get(auth::discovery_start))
        .route("/auth/redirect", get(auth::redirect))
        .route("/auth/select-team", get(auth::select_team))
        .route("/auth/switch-team", post(auth::switch_team))
        .route("/auth/register", post(auth::register))
        .route("/auth/logout", get(auth::logout))
        .route("/api/session", get(api::session))
        .route("/api/organizations", get(api::organizations))
        .route("/api/discovery/organizations", get(api::discovered_organizations))
        .route("/healthz", get(healthz))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            let index = Path::new(&dir).join("index.html");
            let site = ServeDir::new(&dir)
                .append_index_html_on_directories(true)
                .fallback(ServeFile::new(index));
            router.fallback_service(site)
        }
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// CORS for the dashboard origin. Credentials are allowed so the shell can
/// call `/api/*` with its cookies; an unparsable origin allows nothing.
fn cors_layer(origin: &str) -> CorsLayer {
    let origin = HeaderValue::from_str(origin.trim_end_matches('/')).ok();
    if origin.is_none() {
        tracing::warn!("CORS origin is not a valid header value; cross-origin requests disabled");
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origin))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
