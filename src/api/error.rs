//! API error types for the Trello client.

use thiserror::Error;

/// Errors that can occur when interacting with the Trello API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered 401: the key or token was rejected.
    #[error("Unauthorized: {url}")]
    Unauthorized {
        /// The requested URL, with credentials redacted.
        url: String,
    },

    /// The server answered with any status other than 200 or 401.
    #[error("Resource unavailable: {url} (HTTP status: {status})")]
    ResourceUnavailable {
        /// The requested URL, with credentials redacted.
        url: String,
        /// The HTTP status code returned by the server.
        status: u16,
    },

    /// Network or HTTP error raised by reqwest.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A custom transport failed before producing a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not valid JSON or lacked a required field.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// A card has no recorded actions, so its creation date is unknown.
    #[error("Card '{card_id}' has no actions to derive a creation date from")]
    NoActions {
        /// The card that was queried.
        card_id: String,
    },

    /// The server returned a different id than the one that was requested.
    #[error("Id mismatch: requested '{expected}' but server returned '{actual}'")]
    IdMismatch {
        /// The id the entity was constructed with.
        expected: String,
        /// The id found in the response body.
        actual: String,
    },

    /// The client was given an unusable combination of credentials.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from a non-200 HTTP status code.
    pub fn from_status(status: u16, url: &str) -> Self {
        match status {
            401 => ApiError::Unauthorized {
                url: url.to_string(),
            },
            _ => ApiError::ResourceUnavailable {
                url: url.to_string(),
                status,
            },
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::ResourceUnavailable { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
