//! LinkedIn wire types.
//!
//! Every field LinkedIn might omit is optional here and checked when converting into the
//! core types, so a missing field becomes a typed error instead of a panic further down.

use ras_identity_core::{StrategyError, StrategyResult, TokenData};
use serde::Deserialize;
use std::collections::HashMap;

/// Locale used for display names.
pub const DISPLAY_LOCALE: &str = "en_US";

/// Body returned by the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

impl TokenResponse {
    pub fn into_token_data(self) -> StrategyResult<TokenData> {
        let access_token = self
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                StrategyError::TokenExchangeFailed("response has no access_token".to_string())
            })?;
        let expires_in = self.expires_in.ok_or_else(|| {
            StrategyError::TokenExchangeFailed("response has no expires_in".to_string())
        })?;

        Ok(TokenData {
            access_token,
            expires_in,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedString {
    #[serde(default)]
    pub localized: HashMap<String, String>,
}

/// Lite profile from `/v2/me`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Option<String>,
    pub first_name: Option<LocalizedString>,
    pub last_name: Option<LocalizedString>,
}

impl ProfileResponse {
    pub fn user_id(&self) -> StrategyResult<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StrategyError::ProfileFetchFailed("profile has no id".to_string()))
    }

    /// First and last name in [`DISPLAY_LOCALE`], separated by a space.
    pub fn display_name(&self) -> StrategyResult<String> {
        let first = localized(self.first_name.as_ref(), "firstName")?;
        let last = localized(self.last_name.as_ref(), "lastName")?;
        Ok(format!("{} {}", first, last))
    }
}

fn localized<'a>(field: Option<&'a LocalizedString>, name: &str) -> StrategyResult<&'a str> {
    field
        .and_then(|field| field.localized.get(DISPLAY_LOCALE))
        .map(String::as_str)
        .ok_or_else(|| {
            StrategyError::ProfileFetchFailed(format!(
                "profile has no {} localized for {}",
                name, DISPLAY_LOCALE
            ))
        })
}

/// Primary email response from `/v2/emailAddress`
#[derive(Debug, Clone, Deserialize)]
pub struct EmailResponse {
    #[serde(default)]
    pub elements: Vec<EmailElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailElement {
    #[serde(rename = "handle~")]
    pub handle: Option<EmailHandle>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailHandle {
    pub email_address: Option<String>,
}

impl EmailResponse {
    /// Address of the first returned email handle.
    pub fn primary_email(&self) -> StrategyResult<&str> {
        let element = self.elements.first().ok_or_else(|| {
            StrategyError::ProfileFetchFailed("email response has no elements".to_string())
        })?;

        element
            .handle
            .as_ref()
            .and_then(|handle| handle.email_address.as_deref())
            .ok_or_else(|| {
                StrategyError::ProfileFetchFailed("email element has no address".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_into_token_data() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc123","expires_in":5184000}"#).unwrap();

        let token = response.into_token_data().unwrap();
        assert_eq!(token.access_token, "abc123");
        assert_eq!(token.expires_in, 5184000);
    }

    #[test]
    fn test_token_response_missing_fields() {
        let response: TokenResponse = serde_json::from_str(r#"{"expires_in":60}"#).unwrap();
        assert!(matches!(
            response.into_token_data(),
            Err(StrategyError::TokenExchangeFailed(_))
        ));

        let response: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert!(matches!(
            response.into_token_data(),
            Err(StrategyError::TokenExchangeFailed(_))
        ));
    }

    #[test]
    fn test_profile_display_name() {
        let profile: ProfileResponse = serde_json::from_str(
            r#"{
                "id": "X1",
                "firstName": {"localized": {"en_US": "Ada"}, "preferredLocale": {"country": "US", "language": "en"}},
                "lastName": {"localized": {"en_US": "Lovelace"}},
                "profilePicture": {"displayImage": "urn:li:digitalmediaAsset:123"}
            }"#,
        )
        .unwrap();

        assert_eq!(profile.user_id().unwrap(), "X1");
        assert_eq!(profile.display_name().unwrap(), "Ada Lovelace");
    }

    #[test]
    fn test_profile_without_english_name() {
        let profile: ProfileResponse = serde_json::from_str(
            r#"{"id": "X1", "firstName": {"localized": {"de_DE": "Ada"}}, "lastName": {"localized": {"en_US": "Lovelace"}}}"#,
        )
        .unwrap();

        assert!(matches!(
            profile.display_name(),
            Err(StrategyError::ProfileFetchFailed(_))
        ));
    }

    #[test]
    fn test_primary_email() {
        let email: EmailResponse = serde_json::from_str(
            r#"{"elements":[{"handle":"urn:li:emailAddress:1","handle~":{"emailAddress":"ada@example.com"}},{"handle~":{"emailAddress":"other@example.com"}}]}"#,
        )
        .unwrap();
        assert_eq!(email.primary_email().unwrap(), "ada@example.com");
    }

    #[test]
    fn test_email_without_elements() {
        let email: EmailResponse = serde_json::from_str(r#"{"elements":[]}"#).unwrap();
        assert!(matches!(
            email.primary_email(),
            Err(StrategyError::ProfileFetchFailed(_))
        ));

        let email: EmailResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(email.primary_email().is_err());
    }
}
