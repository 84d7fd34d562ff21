//! axum middleware wrapping a host route with the LinkedIn login flow.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/auth/linkedin", get(on_login))
//!     .route_layer(middleware::from_fn_with_state(strategy, linkedin_auth));
//! ```
//!
//! A completed login reaches the inner handler as an `Extension<AuthData>`.

use crate::strategy::LinkedInStrategy;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use ras_identity_core::{AuthStrategy, StrategyOutcome, StrategyRequest};
use std::sync::Arc;
use tracing::error;

pub async fn linkedin_auth(
    State(strategy): State<Arc<LinkedInStrategy>>,
    mut request: Request,
    next: Next,
) -> Response {
    let strategy_request = StrategyRequest::from_uri(request.uri());

    match strategy.handle(&strategy_request).await {
        Ok(StrategyOutcome::Redirect { location }) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Ok(StrategyOutcome::Authenticated(auth_data)) => {
            request.extensions_mut().insert(auth_data);
            next.run(request).await
        }
        Ok(StrategyOutcome::PassThrough) => next.run(request).await,
        Err(e) => {
            error!("LinkedIn login failed: {}", e);
            e.into_response()
        }
    }
}
