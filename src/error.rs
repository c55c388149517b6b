//! Crate-level error type.
//!
//! Most calls return [`ApiError`] directly. Entry points that also touch the
//! configuration file return [`Error`], which wraps both.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl Error {
    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find the configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read the credentials file. Please check it exists and is readable."
                        .to_string()
                }
                ConfigError::ParseError(_) => {
                    "The credentials file is invalid. It needs at least api_key and token."
                        .to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            Error::Api(e) => match e {
                ApiError::Unauthorized { .. } => {
                    "Authentication failed. Please check your API key and token.".to_string()
                }
                ApiError::ResourceUnavailable { status, .. } => {
                    format!("Trello could not serve the request (HTTP {}).", status)
                }
                ApiError::Network(_) | ApiError::Transport(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from Trello. Please try again.".to_string()
                }
                ApiError::NoActions { card_id } => {
                    format!("Card '{}' has no creation record.", card_id)
                }
                ApiError::IdMismatch { expected, actual } => format!(
                    "Asked Trello for '{}' but received '{}'.",
                    expected, actual
                ),
                ApiError::Configuration(msg) => format!("Configuration error: {}", msg),
            },
        }
    }

    /// Check if this error is critical.
    ///
    /// Critical errors mean no request can succeed until the user fixes
    /// their setup.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::Api(ApiError::Unauthorized { .. })
                | Error::Api(ApiError::Configuration(_))
        )
    }
}

/// Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;
