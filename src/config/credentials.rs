//! Trello credential configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// API credentials for Trello.
///
/// `api_key` and `token` are always required. Setting both `api_secret` and
/// `token_secret` switches the client to OAuth-signed requests.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// The application API key from https://trello.com/app-key.
    pub api_key: String,

    /// The user token authorizing the application.
    pub token: String,

    /// The OAuth consumer secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,

    /// The OAuth token secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
}

impl Credentials {
    /// Credentials for query-string authentication.
    pub fn new(api_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            token: token.into(),
            api_secret: None,
            token_secret: None,
        }
    }

    /// Add the secrets needed for OAuth signing.
    pub fn with_oauth_secrets(
        mut self,
        api_secret: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        self.api_secret = Some(api_secret.into());
        self.token_secret = Some(token_secret.into());
        self
    }

    /// Whether these credentials select OAuth signing.
    pub fn is_oauth(&self) -> bool {
        has_value(&self.api_secret) && has_value(&self.token_secret)
    }

    /// Validate these credentials.
    ///
    /// Checks that:
    /// - The API key and token are non-empty
    /// - Neither contains whitespace
    /// - The OAuth secrets are either both set or both absent
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "api_key cannot be empty".to_string(),
            ));
        }

        if self.token.is_empty() {
            return Err(ConfigError::ValidationError(
                "token cannot be empty".to_string(),
            ));
        }

        if self.api_key.contains(char::is_whitespace) || self.token.contains(char::is_whitespace)
        {
            return Err(ConfigError::ValidationError(
                "api_key and token cannot contain whitespace".to_string(),
            ));
        }

        if has_value(&self.api_secret) != has_value(&self.token_secret) {
            return Err(ConfigError::ValidationError(
                "api_secret and token_secret must be set together".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("oauth", &self.is_oauth())
            .finish_non_exhaustive()
    }
}

fn has_value(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
