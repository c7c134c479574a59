mod config;
mod error;
mod routes;
mod services;
mod state;
mod stytch;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let provider = stytch::StytchClient::new(config.stytch.clone()).expect("provider client init failed");
    tracing::info!(
        project_env = ?config.stytch.env,
        base_url = %config.stytch.base_url,
        app_url = %config.app_url,
        "identity provider configured"
    );

    let port = config.port;
    let state = state::AppState::new(config, Arc::new(provider));
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "squircle listening");
    axum::serve(listener, app).await.expect("server failed");
}
