//! Minimal axum server logging a user in with LinkedIn.
//!
//! Set `LINKEDIN_CLIENT_ID`, `LINKEDIN_CLIENT_SECRET` and optionally `LINKEDIN_REDIRECT_URI`,
//! `LINKEDIN_SCOPE` and `SERVER_PORT` (a `.env` file works too), then open
//! `http://localhost:3000/auth/linkedin`.

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, middleware};
use ras_identity_linkedin::{AuthData, LinkedInStrategy, StrategyConfig, linkedin_auth};
use std::sync::Arc;
use tracing::{info, warn};

async fn on_login(request: Request) -> Response {
    match request.extensions().get::<AuthData>() {
        Some(auth_data) => Json(auth_data.user_info.clone()).into_response(),
        None => "Nothing to see here".into_response(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkedin_login=info,ras_identity_linkedin=debug".into()),
        )
        .init();

    let _ = dotenvy::dotenv();

    let config = StrategyConfig::new([
        (
            "client_id",
            std::env::var("LINKEDIN_CLIENT_ID")
                .context("LINKEDIN_CLIENT_ID environment variable is required")?,
        ),
        (
            "redirect_uri",
            std::env::var("LINKEDIN_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:3000/auth/linkedin".to_string()),
        ),
        ("response_type", "code".to_string()),
        (
            "scope",
            std::env::var("LINKEDIN_SCOPE")
                .unwrap_or_else(|_| "r_liteprofile%20r_emailaddress".to_string()),
        ),
        (
            "client_secret",
            std::env::var("LINKEDIN_CLIENT_SECRET")
                .context("LINKEDIN_CLIENT_SECRET environment variable is required")?,
        ),
        ("grant_type", "authorization_code".to_string()),
    ])?;

    let strategy = Arc::new(LinkedInStrategy::new(config)?);

    let app = Router::new()
        .route("/auth/linkedin", get(on_login))
        .route_layer(middleware::from_fn_with_state(strategy, linkedin_auth));

    let port: u16 = std::env::var("SERVER_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .context("SERVER_PORT must be a valid port number")?;
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!("Server running on http://{}", bind_addr);
    warn!("The access token is discarded after login; nothing is persisted.");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
