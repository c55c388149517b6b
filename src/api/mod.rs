//! Trello API client and types.
//!
//! This module provides the interface for communicating with the Trello REST API.

mod auth;
mod client;
pub mod error;
pub mod filter;
pub mod transport;
pub mod types;

pub use auth::Auth;
pub use client::{redact_credentials, ApiRequest, TrelloClient, TrelloClientBuilder, API_BASE_URL};
pub use error::ApiError;
pub use filter::{ActionFilter, ActionType, StatusFilter};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
