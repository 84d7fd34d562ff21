//! LinkedIn OAuth2 login strategy.
//!
//! Implements the client side of the authorization-code flow: redirect to LinkedIn's consent
//! screen, exchange the returned code for an access token, then fetch the member's profile and
//! primary email and merge them into a [`NormalizedIdentity`]. It plugs into any host through
//! the [`AuthStrategy`] trait, or into axum directly through [`linkedin_auth`].

mod callback;
mod client;
mod codec;
mod config;
mod middleware;
mod strategy;
mod types;


pub use callback::{CallbackQuery, FlowStep, dispatch};
pub use client::{DEFAULT_HTTP_TIMEOUT_SECONDS, LinkedInClient, normalize_identity};
pub use codec::{decode_code, encode_code};
pub use config::{DEFAULT_GRANT_TYPE, LinkedInEndpoints, StrategyConfig};
pub use middleware::linkedin_auth;
pub use strategy::{LinkedInStrategy, PROVIDER_NAME};
pub use types::{
    DISPLAY_LOCALE, EmailElement, EmailHandle, EmailResponse, LocalizedString, ProfileResponse,
    TokenResponse,
};

// Re-export common types for convenience
pub use ras_identity_core::{
    AuthData, AuthStrategy, NormalizedIdentity, StrategyError, StrategyOutcome, StrategyRequest,
    StrategyResult, TokenData,
};
