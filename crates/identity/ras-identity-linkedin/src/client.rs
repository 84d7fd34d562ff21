//! LinkedIn HTTP client: code-for-token exchange and identity lookup.

use crate::config::{LinkedInEndpoints, StrategyConfig};
use crate::types::{EmailResponse, ProfileResponse, TokenResponse};
use ras_identity_core::{NormalizedIdentity, StrategyError, StrategyResult, TokenData};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

const PROFILE_PROJECTION: &str =
    "(id,firstName,lastName,profilePicture(displayImage~:playableStreams))";
const EMAIL_PROJECTION: &str = "(elements*(handle~))";

pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

#[derive(Clone)]
pub struct LinkedInClient {
    http_client: Client,
    endpoints: LinkedInEndpoints,
}

impl LinkedInClient {
    pub fn new(endpoints: LinkedInEndpoints, http_timeout_seconds: u64) -> StrategyResult<Self> {
        endpoints.validate()?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(http_timeout_seconds))
            .build()
            .map_err(|e| StrategyError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &LinkedInEndpoints {
        &self.endpoints
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(
        &self,
        config: &StrategyConfig,
        code: &str,
    ) -> StrategyResult<TokenData> {
        let params = [
            ("grant_type", config.grant_type()),
            ("client_id", config.client_id()),
            ("client_secret", config.client_secret()),
            ("code", code),
            ("redirect_uri", config.redirect_uri()),
        ];

        let response = self
            .http_client
            .post(&self.endpoints.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| StrategyError::TokenExchangeFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Token exchange failed with status {}: {}", status, error_text);
            return Err(StrategyError::TokenExchangeFailed(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| StrategyError::TokenExchangeFailed(e.to_string()))?;

        let token_data = token_response.into_token_data()?;
        info!("Successfully exchanged code for tokens");
        Ok(token_data)
    }

    /// Fetch profile and primary email together and merge them.
    ///
    /// Both requests must succeed; a failure of either one fails the whole lookup.
    pub async fn fetch_identity(
        &self,
        provider: &str,
        token: &TokenData,
    ) -> StrategyResult<NormalizedIdentity> {
        let (profile, email) = tokio::try_join!(
            self.fetch_profile(&token.access_token),
            self.fetch_email(&token.access_token)
        )?;

        normalize_identity(provider, &profile, &email)
    }

    async fn fetch_profile(&self, access_token: &str) -> StrategyResult<ProfileResponse> {
        let url = format!(
            "{}?projection={}",
            self.endpoints.profile_endpoint, PROFILE_PROJECTION
        );
        self.get_json(&url, access_token).await
    }

    async fn fetch_email(&self, access_token: &str) -> StrategyResult<EmailResponse> {
        let url = format!(
            "{}?q=members&projection={}",
            self.endpoints.email_endpoint, EMAIL_PROJECTION
        );
        self.get_json(&url, access_token).await
    }

    async fn get_json<T>(&self, url: &str, access_token: &str) -> StrategyResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| StrategyError::ProfileFetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("LinkedIn API request failed with status {}: {}", status, error_text);
            return Err(StrategyError::ProfileFetchFailed(format!(
                "LinkedIn API returned {}",
                status
            )));
        }

        let body = response
            .json()
            .await
            .map_err(|e| StrategyError::ProfileFetchFailed(e.to_string()))?;

        debug!("Fetched LinkedIn API resource");
        Ok(body)
    }
}

/// Merge the profile and email payloads into the provider-agnostic identity.
pub fn normalize_identity(
    provider: &str,
    profile: &ProfileResponse,
    email: &EmailResponse,
) -> StrategyResult<NormalizedIdentity> {
    Ok(NormalizedIdentity {
        provider: provider.to_string(),
        provider_user_id: profile.user_id()?.to_string(),
        display_name: Some(profile.display_name()?),
        emails: Some(vec![email.primary_email()?.to_string()]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identity() {
        let profile: ProfileResponse = serde_json::from_str(
            r#"{"id":"X1","firstName":{"localized":{"en_US":"Ada"}},"lastName":{"localized":{"en_US":"Lovelace"}}}"#,
        )
        .unwrap();
        let email: EmailResponse = serde_json::from_str(
            r#"{"elements":[{"handle~":{"emailAddress":"ada@example.com"}}]}"#,
        )
        .unwrap();

        let identity = normalize_identity("linkedIn", &profile, &email).unwrap();
        assert_eq!(
            identity,
            NormalizedIdentity {
                provider: "linkedIn".to_string(),
                provider_user_id: "X1".to_string(),
                display_name: Some("Ada Lovelace".to_string()),
                emails: Some(vec!["ada@example.com".to_string()]),
            }
        );
    }

    #[test]
    fn test_normalize_identity_requires_id() {
        let profile: ProfileResponse = serde_json::from_str(
            r#"{"firstName":{"localized":{"en_US":"Ada"}},"lastName":{"localized":{"en_US":"Lovelace"}}}"#,
        )
        .unwrap();
        let email: EmailResponse = serde_json::from_str(
            r#"{"elements":[{"handle~":{"emailAddress":"ada@example.com"}}]}"#,
        )
        .unwrap();

        assert!(matches!(
            normalize_identity("linkedIn", &profile, &email),
            Err(StrategyError::ProfileFetchFailed(_))
        ));
    }

    #[test]
    fn test_client_rejects_invalid_endpoints() {
        let mut endpoints = LinkedInEndpoints::default();
        endpoints.profile_endpoint = "::not-a-url".to_string();

        assert!(matches!(
            LinkedInClient::new(endpoints, DEFAULT_HTTP_TIMEOUT_SECONDS),
            Err(StrategyError::ConfigError(_))
        ));
    }
}
