//! Strategy configuration and provider endpoints.

use ras_identity_core::{StrategyError, StrategyResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

const REQUIRED_KEYS: [&str; 5] = [
    "client_id",
    "redirect_uri",
    "response_type",
    "scope",
    "client_secret",
];

/// Keys that never appear in the authorization redirect.
const REDIRECT_EXCLUDED_KEYS: [&str; 2] = ["client_secret", "grant_type"];

pub const DEFAULT_GRANT_TYPE: &str = "authorization_code";

/// Validated LinkedIn client configuration.
///
/// Entries keep their insertion order, which is also the order of the parameters in the
/// authorization redirect. Unknown keys are passed through to that redirect verbatim.
#[derive(Clone)]
pub struct StrategyConfig {
    entries: Vec<(String, String)>,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    grant_type: String,
    authorization_query: String,
}

impl StrategyConfig {
    /// Validate the options and derive the authorization query.
    ///
    /// A repeated key overwrites the earlier value but keeps its original position.
    pub fn new<I, K, V>(options: I) -> StrategyResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (key, value) in options {
            let (key, value) = (key.into(), value.into());
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }

        let lookup = |key: &str| {
            entries
                .iter()
                .find(|(existing, _)| existing == key)
                .map(|(_, value)| value.clone())
                .filter(|value| !value.is_empty())
        };

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| lookup(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(StrategyError::ConfigError(format!(
                "missing required arguments: {}",
                missing.join(", ")
            )));
        }

        let client_id = lookup("client_id").unwrap_or_default();
        let client_secret = lookup("client_secret").unwrap_or_default();
        let redirect_uri = lookup("redirect_uri").unwrap_or_default();
        let grant_type = lookup("grant_type").unwrap_or_else(|| DEFAULT_GRANT_TYPE.to_string());

        let authorization_query = entries
            .iter()
            .filter(|(key, _)| !REDIRECT_EXCLUDED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        Ok(Self {
            entries,
            client_id,
            client_secret,
            redirect_uri,
            grant_type,
            authorization_query,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn grant_type(&self) -> &str {
        &self.grant_type
    }

    /// Any configured value by key, including passthrough parameters.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// The `key=value&...` string appended to the authorization endpoint.
    pub fn authorization_query(&self) -> &str {
        &self.authorization_query
    }
}

impl fmt::Debug for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("grant_type", &self.grant_type)
            .field("authorization_query", &self.authorization_query)
            .finish()
    }
}

/// LinkedIn endpoint URLs. Override these to run the flow against a mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedInEndpoints {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub profile_endpoint: String,
    pub email_endpoint: String,
}

impl Default for LinkedInEndpoints {
    fn default() -> Self {
        Self::with_hosts("https://www.linkedin.com", "https://api.linkedin.com")
    }
}

impl LinkedInEndpoints {
    /// Build the endpoint set from the OAuth host and the REST API host.
    pub fn with_hosts(oauth_host: &str, api_host: &str) -> Self {
        let oauth_host = oauth_host.trim_end_matches('/');
        let api_host = api_host.trim_end_matches('/');

        Self {
            authorization_endpoint: format!("{}/oauth/v2/authorization", oauth_host),
            token_endpoint: format!("{}/oauth/v2/accessToken", oauth_host),
            profile_endpoint: format!("{}/v2/me", api_host),
            email_endpoint: format!("{}/v2/emailAddress", api_host),
        }
    }

    pub fn validate(&self) -> StrategyResult<()> {
        for (name, endpoint) in [
            ("authorization_endpoint", &self.authorization_endpoint),
            ("token_endpoint", &self.token_endpoint),
            ("profile_endpoint", &self.profile_endpoint),
            ("email_endpoint", &self.email_endpoint),
        ] {
            Url::parse(endpoint).map_err(|e| {
                StrategyError::ConfigError(format!("invalid {} '{}': {}", name, endpoint, e))
            })?;
        }
        Ok(())
    }
}
