//! Trello API client implementation.
//!
//! This module provides the main client for the Trello REST API v1. It builds
//! authenticated URLs, performs exactly one HTTP request per call through the
//! configured transport, maps status codes to errors, and decodes JSON.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::transport::{HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
use super::types::{BoardResponse, ListResponse};
use crate::config::{self, Credentials};
use crate::resources::{Board, Card, List, Member};

/// Root of every Trello API URL.
pub const API_BASE_URL: &str = "https://api.trello.com/1";

/// Placeholder substituted for credential values in logged URLs.
const REDACTED: &str = "REDACTED";

/// A single API call: path, method, extra headers, query and JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append a query parameter. Order of calls is preserved on the wire.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the JSON body sent with POST, PUT and DELETE requests.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The Trello API client.
///
/// Every entity produced by the client borrows it, so the client must outlive
/// the boards, lists, cards and members obtained from it.
pub struct TrelloClient {
    /// The HTTP transport.
    transport: Box<dyn HttpTransport>,
    /// The API root, normally [`API_BASE_URL`].
    base_url: String,
    /// Authentication credentials.
    auth: Auth,
}

impl fmt::Debug for TrelloClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrelloClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl TrelloClient {
    /// Create a client using query-string authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is empty or the HTTP client cannot
    /// be built.
    pub fn new(api_key: &str, token: &str) -> Result<Self> {
        Self::builder().api_key(api_key).token(token).build()
    }

    /// Create a client that signs every request with OAuth 1.0a.
    pub fn with_oauth(
        api_key: &str,
        token: &str,
        api_secret: &str,
        token_secret: &str,
    ) -> Result<Self> {
        Self::builder()
            .api_key(api_key)
            .token(token)
            .oauth_secrets(api_secret, token_secret)
            .build()
    }

    /// Create a client from loaded credentials, choosing the scheme from
    /// which secrets are present.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let mut builder = Self::builder()
            .api_key(&credentials.api_key)
            .token(&credentials.token);
        builder.api_secret = credentials.api_secret.clone();
        builder.token_secret = credentials.token_secret.clone();
        builder.build()
    }

    /// Load credentials from a TOML file and create a client from them.
    pub fn from_config_file(path: &Path) -> crate::Result<Self> {
        let credentials = config::load(path)?;
        Ok(Self::from_credentials(&credentials)?)
    }

    pub fn builder() -> TrelloClientBuilder {
        TrelloClientBuilder::default()
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an authenticated URL.
    ///
    /// Produces `<base>/<path>?key=<key>&token=<token>` followed by the extra
    /// query parameters, urlencoded, in the order given. No I/O.
    pub fn build_url<K: AsRef<str>, V: AsRef<str>>(&self, path: &str, query: &[(K, V)]) -> String {
        let mut url = self.base_url.clone();
        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);

        url.push_str("?key=");
        url.push_str(&urlencoding::encode(self.auth.api_key()));
        url.push_str("&token=");
        url.push_str(&urlencoding::encode(self.auth.token()));

        for (k, v) in query {
            url.push('&');
            url.push_str(&urlencoding::encode(k.as_ref()));
            url.push('=');
            url.push_str(&urlencoding::encode(v.as_ref()));
        }

        url
    }

    /// Perform one request and return the decoded JSON body.
    ///
    /// Only status 200 is success. 401 maps to `ApiError::Unauthorized`;
    /// every other status maps to `ApiError::ResourceUnavailable`.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub fn fetch_json(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.build_url(&request.path, &request.query);
        let safe_url = redact_credentials(&url);

        let mut headers = request.headers.clone();
        if request.method.has_body() {
            set_header(&mut headers, "Content-Type", "application/json");
        }
        set_header(&mut headers, "Accept", "application/json");
        if let Some(value) = self.auth.authorization_header(request.method, &url)? {
            set_header(&mut headers, "Authorization", &value);
        }

        let body = if request.method.has_body() {
            Some(
                request
                    .body
                    .as_ref()
                    .map_or_else(|| "{}".to_string(), Value::to_string),
            )
        } else {
            None
        };

        debug!(url = %safe_url, "Sending request");
        let response = self.transport.send(&HttpRequest {
            method: request.method,
            url,
            headers,
            body,
        })?;
        debug!(status = response.status, "Received response");

        if response.status != 200 {
            debug!("Error response body: {}", response.body);
            return Err(ApiError::from_status(response.status, &safe_url));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Perform one request and deserialize the body into `T`.
    pub fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let value = self.fetch_json(request)?;
        serde_json::from_value(value).map_err(|e| {
            ApiError::InvalidResponse(format!("Unexpected shape for {}: {}", request.path, e))
        })
    }

    /// List every board of the authenticated member.
    ///
    /// Calls `GET /members/me/boards/all`.
    #[instrument(skip(self))]
    pub fn list_boards(&self) -> Result<Vec<Board<'_>>> {
        let boards: Vec<BoardResponse> = self.fetch(&ApiRequest::get("/members/me/boards/all"))?;
        debug!("Fetched {} boards", boards.len());
        Ok(boards
            .into_iter()
            .map(|b| Board::from_response(self, b))
            .collect())
    }

    /// Get a single board by id.
    #[instrument(skip(self))]
    pub fn get_board(&self, board_id: &str) -> Result<Board<'_>> {
        let board: BoardResponse = self.fetch(&ApiRequest::get(format!("/boards/{}", board_id)))?;
        Ok(Board::from_response(self, board))
    }

    /// Get a single list by id. The response must name the owning board.
    #[instrument(skip(self))]
    pub fn get_list(&self, list_id: &str) -> Result<List<'_>> {
        let list: ListResponse = self.fetch(&ApiRequest::get(format!("/lists/{}", list_id)))?;
        let board_id = list.id_board.clone().ok_or_else(|| {
            ApiError::InvalidResponse(format!("list '{}' has no idBoard", list.id))
        })?;
        Ok(List::from_response(self, &board_id, list))
    }

    /// Get a single card by id, fully hydrated.
    #[instrument(skip(self))]
    pub fn get_card(&self, card_id: &str) -> Result<Card<'_>> {
        let mut card = Card::new(self, card_id);
        card.fetch()?;
        Ok(card)
    }

    /// Get a single member by id, username or `me`.
    #[instrument(skip(self))]
    pub fn get_member(&self, member_id: &str) -> Result<Member<'_>> {
        let mut member = Member::new(self, member_id);
        member.fetch()?;
        Ok(member)
    }
}

/// Builder for [`TrelloClient`].
#[derive(Default)]
pub struct TrelloClientBuilder {
    api_key: Option<String>,
    token: Option<String>,
    api_secret: Option<String>,
    token_secret: Option<String>,
    transport: Option<Box<dyn HttpTransport>>,
    base_url: Option<String>,
}

impl TrelloClientBuilder {
    pub fn api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Enable OAuth signing.
    pub fn oauth_secrets(mut self, api_secret: &str, token_secret: &str) -> Self {
        self.api_secret = Some(api_secret.to_string());
        self.token_secret = Some(token_secret.to_string());
        self
    }

    /// Use a custom transport instead of the default reqwest one.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Point the client at a different API root, e.g. a local mock server.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    /// Validate the credentials and build the client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the key or token is missing or
    /// only one OAuth secret is set, and `ApiError::Network` if the default
    /// transport cannot be built.
    pub fn build(self) -> Result<TrelloClient> {
        let auth = Auth::from_parts(
            self.api_key.as_deref().unwrap_or_default(),
            self.token.as_deref().unwrap_or_default(),
            self.api_secret.as_deref(),
            self.token_secret.as_deref(),
        )?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::new()?),
        };

        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(API_BASE_URL));

        Ok(TrelloClient {
            transport,
            base_url,
            auth,
        })
    }
}

/// Replace a header (case-insensitively) or append it.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value.to_string()));
}

/// Mask the `key` and `token` query values so URLs can be logged and
/// carried by errors.
pub fn redact_credentials(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((k, _)) if k == "key" || k == "token" => format!("{}={}", k, REDACTED),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::mock_client;

    const NO_QUERY: &[(&str, &str)] = &[];

    fn client() -> TrelloClient {
        mock_client(vec![]).0
    }

    #[test]
    fn test_build_url_simple() {
        assert_eq!(
            client().build_url("/boards/b1", NO_QUERY),
            "https://api.trello.com/1/boards/b1?key=key&token=token"
        );
    }

    #[test]
    fn test_build_url_adds_leading_slash() {
        assert_eq!(
            client().build_url("boards/b1", NO_QUERY),
            "https://api.trello.com/1/boards/b1?key=key&token=token"
        );
    }

    #[test]
    fn test_build_url_appends_encoded_query_in_order() {
        let url = client().build_url(
            "/boards/b1/lists",
            &[("cards", "none"), ("filter", "open"), ("name", "a b&c")],
        );
        assert_eq!(
            url,
            "https://api.trello.com/1/boards/b1/lists?key=key&token=token&cards=none&filter=open&name=a%20b%26c"
        );
    }

    #[test]
    fn test_build_url_oauth_uses_same_query_auth() {
        let (client, _) = crate::testing::mock_oauth_client(vec![]);
        assert_eq!(
            client.build_url("/members/me", NO_QUERY),
            "https://api.trello.com/1/members/me?key=key&token=token"
        );
    }

    #[test]
    fn test_fetch_json_returns_body_on_200() {
        let (client, _) = mock_client(vec![(200, r#"{"id":"b1"}"#)]);
        let value = client.fetch_json(&ApiRequest::get("/boards/b1")).unwrap();
        assert_eq!(value, json!({"id": "b1"}));
    }

    #[test]
    fn test_fetch_json_returns_arrays() {
        let (client, _) = mock_client(vec![(200, "[1,2,3]")]);
        let value = client.fetch_json(&ApiRequest::get("/x")).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_fetch_json_401_is_unauthorized() {
        let (client, _) = mock_client(vec![(401, "invalid token")]);
        let err = client.fetch_json(&ApiRequest::get("/boards/b1")).unwrap_err();
        match err {
            ApiError::Unauthorized { url } => {
                assert_eq!(
                    url,
                    "https://api.trello.com/1/boards/b1?key=REDACTED&token=REDACTED"
                );
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_json_non_200_is_unavailable_with_status() {
        for status in [201, 204, 400, 403, 404, 429, 500, 503] {
            let (client, _) = mock_client(vec![(status, "")]);
            let err = client.fetch_json(&ApiRequest::get("/cards/c1")).unwrap_err();
            assert!(
                matches!(err, ApiError::ResourceUnavailable { status: s, .. } if s == status),
                "status {} mapped to {:?}",
                status,
                err
            );
        }
    }

    #[test]
    fn test_fetch_json_invalid_body() {
        let (client, _) = mock_client(vec![(200, "not json")]);
        let err = client.fetch_json(&ApiRequest::get("/x")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_get_sends_accept_but_no_body() {
        let (client, mock) = mock_client(vec![(200, "{}")]);
        client
            .fetch_json(&ApiRequest::get("/boards/b1").query("filter", "open"))
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.header("Content-Type"), None);
        assert!(request.body.is_none());
        assert!(request.url.ends_with("&filter=open"));
    }

    #[test]
    fn test_post_sends_json_body() {
        let (client, mock) = mock_client(vec![(200, "{}")]);
        client
            .fetch_json(&ApiRequest::post("/lists").json(json!({"name": "Todo", "idBoard": "b1"})))
            .unwrap();

        let requests = mock.requests();
        let request = &requests[0];
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("accept"), Some("application/json"));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "Todo", "idBoard": "b1"}));
    }

    #[test]
    fn test_delete_without_args_sends_empty_object() {
        let (client, mock) = mock_client(vec![(200, "{}")]);
        client.fetch_json(&ApiRequest::delete("/cards/c1")).unwrap();
        assert_eq!(mock.requests()[0].body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_caller_headers_are_kept() {
        let (client, mock) = mock_client(vec![(200, "{}")]);
        client
            .fetch_json(&ApiRequest::get("/x").header("X-Trace", "abc").header("accept", "text/plain"))
            .unwrap();
        let requests = mock.requests();
        let request = &requests[0];
        assert_eq!(request.header("X-Trace"), Some("abc"));
        assert_eq!(request.header("Accept"), Some("application/json"));
    }

    #[test]
    fn test_oauth_requests_are_signed() {
        let (client, mock) = crate::testing::mock_oauth_client(vec![(200, "{}")]);
        client.fetch_json(&ApiRequest::get("/members/me")).unwrap();
        let header = mock.requests()[0].header("Authorization").unwrap().to_string();
        assert!(header.starts_with("OAuth "));
    }

    #[test]
    fn test_simple_requests_are_not_signed() {
        let (client, mock) = mock_client(vec![(200, "{}")]);
        client.fetch_json(&ApiRequest::get("/members/me")).unwrap();
        assert!(mock.requests()[0].header("Authorization").is_none());
    }

    #[test]
    fn test_exactly_one_attempt_on_failure() {
        let (client, mock) = mock_client(vec![(500, ""), (200, "{}")]);
        assert!(client.fetch_json(&ApiRequest::get("/x")).is_err());
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_fetch_typed_reports_missing_fields() {
        let (client, _) = mock_client(vec![(200, r#"{"id":"b1"}"#)]);
        let err = client
            .fetch::<BoardResponse>(&ApiRequest::get("/boards/b1"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_list_boards_scenario() {
        let (client, mock) = mock_client(vec![(
            200,
            r#"[{"id":"b1","name":"Demo","closed":false,"url":"http://x"}]"#,
        )]);
        let boards = client.list_boards().unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].id(), "b1");
        assert_eq!(boards[0].name(), Some("Demo"));
        assert_eq!(boards[0].closed(), Some(false));
        assert_eq!(boards[0].description(), Some(""));
        assert!(mock.requests()[0]
            .url
            .starts_with("https://api.trello.com/1/members/me/boards/all?"));
    }

    #[test]
    fn test_get_list_requires_board_id() {
        let (client, _) = mock_client(vec![(200, r#"{"id":"l1","name":"Todo","closed":false}"#)]);
        let err = client.get_list("l1").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_get_list_sets_board_reference() {
        let (client, _) = mock_client(vec![(
            200,
            r#"{"id":"l1","name":"Todo","closed":true,"idBoard":"b9"}"#,
        )]);
        let list = client.get_list("l1").unwrap();
        assert_eq!(list.board_id(), "b9");
        assert_eq!(list.closed(), Some(true));
    }

    #[test]
    fn test_builder_requires_token() {
        let err = TrelloClient::builder()
            .api_key("k")
            .transport(crate::testing::MockTransport::default())
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn test_builder_trims_base_url() {
        let client = TrelloClient::builder()
            .api_key("k")
            .token("t")
            .base_url("http://localhost:9000/1/")
            .transport(crate::testing::MockTransport::default())
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/1");
    }

    #[test]
    fn test_from_config_file_selects_oauth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(
            &path,
            "api_key = \"k\"\ntoken = \"t\"\napi_secret = \"s\"\ntoken_secret = \"ts\"\n",
        )
        .unwrap();

        let client = TrelloClient::from_config_file(&path).unwrap();
        assert!(client.auth().is_oauth());
        assert_eq!(client.base_url(), API_BASE_URL);
    }

    #[test]
    fn test_from_config_file_reports_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrelloClient::from_config_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        assert!(err.is_critical());
    }

    #[test]
    fn test_from_credentials_simple() {
        let client = TrelloClient::from_credentials(&Credentials::new("k", "t")).unwrap();
        assert!(!client.auth().is_oauth());
        assert_eq!(client.auth().token(), "t");
    }

    #[test]
    fn test_redact_credentials() {
        assert_eq!(
            redact_credentials("https://api.trello.com/1/x?key=abc&token=def&filter=all"),
            "https://api.trello.com/1/x?key=REDACTED&token=REDACTED&filter=all"
        );
        assert_eq!(redact_credentials("https://api.trello.com/1/x"), "https://api.trello.com/1/x");
    }

    #[test]
    fn test_client_debug_hides_token() {
        let (client, _) = mock_client(vec![]);
        let debug_output = format!("{:?}", client);
        assert!(debug_output.contains("api.trello.com"));
        assert!(!debug_output.contains("\"token\""));
    }
}
