//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the immutable config and the identity provider handle; there is no
//! server-side session store, the browser cookies are the only state.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::stytch::IdentityProvider;

/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { config: Arc::new(config), provider }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
