//! The LinkedIn login strategy.

use crate::callback::{CallbackQuery, FlowStep, dispatch};
use crate::client::{DEFAULT_HTTP_TIMEOUT_SECONDS, LinkedInClient};
use crate::config::{LinkedInEndpoints, StrategyConfig};
use async_trait::async_trait;
use ras_identity_core::{
    AuthData, AuthStrategy, StrategyOutcome, StrategyRequest, StrategyResult, TokenData,
};
use tracing::{debug, info, warn};

pub const PROVIDER_NAME: &str = "linkedIn";

/// LinkedIn OAuth2 authorization-code strategy.
///
/// Holds only immutable configuration, so one instance can serve any number of concurrent
/// requests behind an `Arc`.
#[derive(Clone)]
pub struct LinkedInStrategy {
    config: StrategyConfig,
    client: LinkedInClient,
    authorization_url: String,
    http_timeout_seconds: u64,
}

impl LinkedInStrategy {
    pub fn new(config: StrategyConfig) -> StrategyResult<Self> {
        Self::with_options(
            config,
            LinkedInEndpoints::default(),
            DEFAULT_HTTP_TIMEOUT_SECONDS,
        )
    }

    pub fn with_options(
        config: StrategyConfig,
        endpoints: LinkedInEndpoints,
        http_timeout_seconds: u64,
    ) -> StrategyResult<Self> {
        let client = LinkedInClient::new(endpoints, http_timeout_seconds)?;
        let authorization_url = format!(
            "{}?{}",
            client.endpoints().authorization_endpoint,
            config.authorization_query()
        );

        Ok(Self {
            config,
            client,
            authorization_url,
            http_timeout_seconds,
        })
    }

    /// Point the strategy at different LinkedIn hosts.
    pub fn with_endpoints(self, endpoints: LinkedInEndpoints) -> StrategyResult<Self> {
        Self::with_options(self.config, endpoints, self.http_timeout_seconds)
    }

    pub fn with_http_timeout(self, seconds: u64) -> StrategyResult<Self> {
        let endpoints = self.client.endpoints().clone();
        Self::with_options(self.config, endpoints, seconds)
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn authorization_url(&self) -> &str {
        &self.authorization_url
    }

    /// Redirect to the consent screen.
    pub fn authorize(&self) -> StrategyOutcome {
        debug!("Redirecting to LinkedIn authorization endpoint");
        StrategyOutcome::Redirect {
            location: self.authorization_url.clone(),
        }
    }

    /// Complete the flow from a provider callback.
    pub async fn complete_callback(&self, callback: &CallbackQuery) -> StrategyResult<AuthData> {
        if let Err(denied) = callback.check_denied() {
            warn!("LinkedIn denied authorization: {}", denied);
            return Err(denied);
        }

        let code = callback.authorization_code()?;
        let token_data = self.client.exchange_code(&self.config, &code).await?;
        self.fetch_auth_data(token_data).await
    }

    /// Resolve the identity behind an access token.
    pub async fn fetch_auth_data(&self, token_data: TokenData) -> StrategyResult<AuthData> {
        let user_info = self
            .client
            .fetch_identity(PROVIDER_NAME, &token_data)
            .await?;

        info!(
            "Successfully verified identity for provider {}: {}",
            PROVIDER_NAME, user_info.provider_user_id
        );

        Ok(AuthData {
            token_data,
            user_info,
        })
    }
}

#[async_trait]
impl AuthStrategy for LinkedInStrategy {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn handle(&self, request: &StrategyRequest) -> StrategyResult<StrategyOutcome> {
        match dispatch(request.query()) {
            FlowStep::Authorize => Ok(self.authorize()),
            FlowStep::Callback(callback) => {
                debug!("Received LinkedIn callback");
                let auth_data = self.complete_callback(&callback).await?;
                Ok(StrategyOutcome::Authenticated(auth_data))
            }
            FlowStep::PassThrough => Ok(StrategyOutcome::PassThrough),
        }
    }
}
