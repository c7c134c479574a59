//! Route error type.
//!
//! Failures surface to the browser in one of two ways: a redirect back to the
//! login page, or a generic 500. The cause is logged, never echoed.

use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};

use crate::stytch::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed client input; the message is safe to show.
    #[error("{0}")]
    BadRequest(String),

    /// Auth state is missing; send the browser back to the login page.
    #[error("redirecting to login: {reason}")]
    RedirectToLogin { location: String, reason: &'static str },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            Self::RedirectToLogin { location, reason } => {
                tracing::debug!(%reason, "auth state missing");
                found(&location)
            }
            Self::Provider(e) => {
                tracing::error!(error = %e, "provider call failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
        }
    }
}

/// `302 Found` redirect. axum's `Redirect` covers 303/307/308 only.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_owned())]).into_response()
}
