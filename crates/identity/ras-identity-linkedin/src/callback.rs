//! Callback query parsing and request dispatch.

use crate::codec::decode_code;
use ras_identity_core::{StrategyError, StrategyResult};

/// Parameters LinkedIn sends back to the redirect URI.
const CALLBACK_KEYS: [&str; 3] = ["code", "error", "state"];

/// A callback query split into named parameters.
///
/// Values stay exactly as received. The authorization code only goes through
/// [`decode_code`], never through a general percent-decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackQuery {
    params: Vec<(String, String)>,
}

impl CallbackQuery {
    pub fn parse(query: &str) -> Self {
        let params = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        Self { params }
    }

    /// Raw value of the first parameter called `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_callback(&self) -> bool {
        CALLBACK_KEYS.iter().any(|key| self.get(key).is_some())
    }

    /// Fails with `ProviderDenied` when LinkedIn reported an error instead of a code.
    pub fn check_denied(&self) -> StrategyResult<()> {
        match self.get("error") {
            Some(error) => Err(StrategyError::ProviderDenied {
                error: error.to_string(),
                description: self
                    .get("error_description")
                    .filter(|description| !description.is_empty())
                    .map(str::to_string),
            }),
            None => Ok(()),
        }
    }

    /// The decoded authorization code.
    pub fn authorization_code(&self) -> StrategyResult<String> {
        let raw = self
            .get("code")
            .ok_or_else(|| {
                StrategyError::CodeExtractionFailed("callback has no code parameter".to_string())
            })?;

        if raw.is_empty() {
            return Err(StrategyError::CodeExtractionFailed(
                "callback code parameter is empty".to_string(),
            ));
        }

        Ok(decode_code(raw))
    }
}

/// What to do with an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    Authorize,
    Callback(CallbackQuery),
    PassThrough,
}

pub fn dispatch(query: Option<&str>) -> FlowStep {
    let Some(query) = query.filter(|query| !query.is_empty()) else {
        return FlowStep::Authorize;
    };

    let callback = CallbackQuery::parse(query);
    if callback.is_callback() {
        FlowStep::Callback(callback)
    } else {
        FlowStep::PassThrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_query_dispatches_to_authorize() {
        assert_eq!(dispatch(None), FlowStep::Authorize);
        assert_eq!(dispatch(Some("")), FlowStep::Authorize);
    }

    #[test]
    fn test_code_query_dispatches_to_callback() {
        let step = dispatch(Some("code=AQT123&state=xyz"));
        assert!(matches!(step, FlowStep::Callback(_)));
    }

    #[test]
    fn test_parameter_order_does_not_matter() {
        let FlowStep::Callback(callback) = dispatch(Some("state=xyz&code=AQT%2F123")) else {
            panic!("expected callback");
        };
        assert_eq!(callback.authorization_code().unwrap(), "AQT/123");
        assert_eq!(callback.get("state"), Some("xyz"));
    }

    #[test]
    fn test_unrelated_query_passes_through() {
        assert_eq!(dispatch(Some("page=2&sort=asc")), FlowStep::PassThrough);
        assert_eq!(dispatch(Some("encode=true")), FlowStep::PassThrough);
    }

    #[test]
    fn test_error_query_is_denied() {
        let callback = CallbackQuery::parse(
            "error=access_denied&error_description=The+user+cancelled&state=xyz",
        );
        assert!(callback.is_callback());

        match callback.check_denied() {
            Err(StrategyError::ProviderDenied { error, description }) => {
                assert_eq!(error, "access_denied");
                assert_eq!(description.as_deref(), Some("The+user+cancelled"));
            }
            other => panic!("expected ProviderDenied, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_code_fails_extraction() {
        let callback = CallbackQuery::parse("state=xyz");
        assert!(callback.check_denied().is_ok());
        assert!(matches!(
            callback.authorization_code(),
            Err(StrategyError::CodeExtractionFailed(_))
        ));

        let callback = CallbackQuery::parse("code=&state=xyz");
        assert!(matches!(
            callback.authorization_code(),
            Err(StrategyError::CodeExtractionFailed(_))
        ));
    }

    #[test]
    fn test_code_keeps_unlisted_escapes() {
        let callback = CallbackQuery::parse("code=a%20b%3Dc");
        assert_eq!(callback.authorization_code().unwrap(), "a%20b=c");
    }

    #[test]
    fn test_leading_question_mark_is_ignored() {
        let callback = CallbackQuery::parse("?code=abc");
        assert_eq!(callback.get("code"), Some("abc"));
    }
}
