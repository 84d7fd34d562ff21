//! Core traits and types for OAuth2 login strategies.
//!
//! A strategy sits in front of a host route and turns an inbound request into one of three
//! outcomes: a redirect to the provider's consent screen, an authenticated identity, or a
//! pass-through for requests it does not own. The identity shape is provider-agnostic so
//! downstream code never sees provider-specific JSON.

use async_trait::async_trait;
use axum::Json;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Provider denied authorization: {error}")]
    ProviderDenied {
        error: String,
        description: Option<String>,
    },

    #[error("Could not extract authorization code: {0}")]
    CodeExtractionFailed(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),
}

pub type StrategyResult<T> = Result<T, StrategyError>;

impl StrategyError {
    /// Short machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyError::ConfigError(_) => "config_error",
            StrategyError::ProviderDenied { .. } => "provider_denied",
            StrategyError::CodeExtractionFailed(_) => "code_extraction_failed",
            StrategyError::TokenExchangeFailed(_) => "token_exchange_failed",
            StrategyError::ProfileFetchFailed(_) => "profile_fetch_failed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            StrategyError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StrategyError::ProviderDenied { .. } => StatusCode::UNAUTHORIZED,
            StrategyError::CodeExtractionFailed(_) => StatusCode::BAD_REQUEST,
            StrategyError::TokenExchangeFailed(_) | StrategyError::ProfileFetchFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Client-facing message. Upstream bodies and transport details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            StrategyError::ConfigError(_) => "Authentication is not configured correctly",
            StrategyError::ProviderDenied { .. } => "Authorization was denied by the provider",
            StrategyError::CodeExtractionFailed(_) => "Malformed authorization callback",
            StrategyError::TokenExchangeFailed(_) => "Unable to obtain an access token",
            StrategyError::ProfileFetchFailed(_) => "Unable to obtain user information",
        }
    }
}

impl IntoResponse for StrategyError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.kind(),
            "message": self.public_message(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

/// What a strategy sees of an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyRequest {
    query: Option<String>,
}

impl StrategyRequest {
    pub fn new(query: Option<impl Into<String>>) -> Self {
        Self {
            query: query.map(Into::into),
        }
    }

    pub fn from_uri(uri: &Uri) -> Self {
        Self::new(uri.query())
    }

    /// Raw query string without the leading `?`. An empty query counts as absent.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|query| !query.is_empty())
    }
}

/// Access token issued by the provider. Held only long enough to fetch the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIdentity {
    pub provider: String,
    pub provider_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
}

/// Result of a completed login: the token and the identity it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub token_data: TokenData,
    pub user_info: NormalizedIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// Send the user agent to the provider's consent screen
    Redirect { location: String },
    /// The callback was exchanged and the identity resolved
    Authenticated(AuthData),
    /// Not a request this strategy handles
    PassThrough,
}

#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Fixed provider name stamped onto every identity this strategy produces.
    fn name(&self) -> &str;

    async fn handle(&self, request: &StrategyRequest) -> StrategyResult<StrategyOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_absent() {
        assert_eq!(StrategyRequest::new(Some("")).query(), None);
        assert_eq!(StrategyRequest::new(None::<String>).query(), None);
        assert_eq!(
            StrategyRequest::new(Some("code=abc")).query(),
            Some("code=abc")
        );
    }

    #[test]
    fn test_request_from_uri() {
        let uri: Uri = "/auth/linkedin?code=abc&state=xyz".parse().unwrap();
        assert_eq!(
            StrategyRequest::from_uri(&uri).query(),
            Some("code=abc&state=xyz")
        );

        let uri: Uri = "/auth/linkedin".parse().unwrap();
        assert_eq!(StrategyRequest::from_uri(&uri).query(), None);
    }

    #[test]
    fn test_identity_serializes_camel_case() {
        let identity = NormalizedIdentity {
            provider: "linkedIn".to_string(),
            provider_user_id: "X1".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
            emails: Some(vec!["ada@example.com".to_string()]),
        };

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "provider": "linkedIn",
                "providerUserId": "X1",
                "displayName": "Ada Lovelace",
                "emails": ["ada@example.com"]
            })
        );
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            StrategyError::ConfigError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StrategyError::ProviderDenied {
                error: "access_denied".into(),
                description: None
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            StrategyError::CodeExtractionFailed("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StrategyError::TokenExchangeFailed("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            StrategyError::ProfileFetchFailed("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_response_is_sanitized() {
        let error = StrategyError::TokenExchangeFailed("client_secret=hunter2 rejected".into());
        assert!(!error.public_message().contains("hunter2"));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
