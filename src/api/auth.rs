//! Authentication handling for the Trello API.
//!
//! Trello accepts two schemes: the API key and user token passed in the
//! query string, or OAuth 1.0a requests signed with HMAC-SHA1 using the
//! consumer secret and token secret.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;

use super::error::{ApiError, Result};
use super::transport::HttpMethod;

type HmacSha1 = Hmac<Sha1>;

/// Length of the random nonce sent with each signed request.
const NONCE_LEN: usize = 32;

/// Authentication credentials for Trello.
#[derive(Clone)]
pub enum Auth {
    /// Key and token sent as `key`/`token` query parameters only.
    Simple { api_key: String, token: String },
    /// Key and token in the query string plus an OAuth 1.0a signature.
    OAuth {
        api_key: String,
        api_secret: String,
        token: String,
        token_secret: String,
    },
}

impl Auth {
    /// Credentials for query-string authentication.
    pub fn simple(api_key: &str, token: &str) -> Self {
        Auth::Simple {
            api_key: api_key.to_string(),
            token: token.to_string(),
        }
    }

    /// Credentials for OAuth-signed requests.
    pub fn oauth(api_key: &str, token: &str, api_secret: &str, token_secret: &str) -> Self {
        Auth::OAuth {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            token: token.to_string(),
            token_secret: token_secret.to_string(),
        }
    }

    /// Select the scheme from whatever credential material is present.
    ///
    /// All four values select OAuth; key and token alone select simple
    /// authentication. Empty strings count as missing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` when neither combination is complete.
    pub fn from_parts(
        api_key: &str,
        token: &str,
        api_secret: Option<&str>,
        token_secret: Option<&str>,
    ) -> Result<Self> {
        if api_key.is_empty() || token.is_empty() {
            return Err(ApiError::Configuration(
                "an API key and a token are both required".to_string(),
            ));
        }

        let api_secret = api_secret.filter(|s| !s.is_empty());
        let token_secret = token_secret.filter(|s| !s.is_empty());

        match (api_secret, token_secret) {
            (Some(api_secret), Some(token_secret)) => {
                Ok(Self::oauth(api_key, token, api_secret, token_secret))
            }
            (None, None) => Ok(Self::simple(api_key, token)),
            _ => Err(ApiError::Configuration(
                "OAuth requires both the API secret and the token secret".to_string(),
            )),
        }
    }

    /// The application API key.
    pub fn api_key(&self) -> &str {
        match self {
            Auth::Simple { api_key, .. } | Auth::OAuth { api_key, .. } => api_key,
        }
    }

    /// The user token.
    pub fn token(&self) -> &str {
        match self {
            Auth::Simple { token, .. } | Auth::OAuth { token, .. } => token,
        }
    }

    /// Whether requests are OAuth-signed.
    pub fn is_oauth(&self) -> bool {
        matches!(self, Auth::OAuth { .. })
    }

    /// Build the `Authorization` header for a request, if this scheme uses one.
    pub fn authorization_header(&self, method: HttpMethod, url: &str) -> Result<Option<String>> {
        if !self.is_oauth() {
            return Ok(None);
        }
        let nonce = generate_nonce();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.sign(method, url, &nonce, &timestamp).map(Some)
    }

    /// Produce a complete `OAuth ...` header value with a fixed nonce and
    /// timestamp.
    pub fn sign(&self, method: HttpMethod, url: &str, nonce: &str, timestamp: &str) -> Result<String> {
        let Auth::OAuth {
            api_key,
            api_secret,
            token,
            token_secret,
        } = self
        else {
            return Err(ApiError::Configuration(
                "request signing requires OAuth credentials".to_string(),
            ));
        };

        let oauth_params = [
            ("oauth_consumer_key", api_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let base = signature_base_string(method, url, &oauth_params);
        let key = format!("{}&{}", encode(api_secret), encode(token_secret));

        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| ApiError::Configuration(format!("invalid signing key: {}", e)))?;
        mac.update(base.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        let mut fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, encode(v)))
            .collect();
        fields.push(format!("oauth_signature=\"{}\"", encode(&signature)));
        fields.sort();

        Ok(format!("OAuth {}", fields.join(", ")))
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.is_oauth() { "OAuth" } else { "Simple" };
        f.debug_struct("Auth")
            .field("scheme", &scheme)
            .field("api_key", &self.api_key())
            .finish_non_exhaustive()
    }
}

/// Build the OAuth 1.0a signature base string.
///
/// Query parameters already present in `url` are merged with the protocol
/// parameters, percent-encoded, and sorted by key then value.
fn signature_base_string(method: HttpMethod, url: &str, oauth_params: &[(&str, &str)]) -> String {
    let (base_url, query) = url.split_once('?').unwrap_or((url, ""));

    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (encode(&decode(k)), encode(&decode(v)))
        })
        .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
        .collect();
    params.sort();

    let normalized = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str(),
        encode(base_url),
        encode(&normalized)
    )
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// RFC 3986 percent-encoding: only unreserved characters pass through.
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}
