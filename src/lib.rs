//! A blocking client for the Trello REST API.
//!
//! Boards, lists, cards and members are exposed as plain structs that borrow
//! a [`TrelloClient`]. Each method performs exactly one HTTP request: build
//! an authenticated URL, send it, parse the JSON, hydrate the entity.
//!
//! ```no_run
//! use trello::TrelloClient;
//!
//! # fn main() -> Result<(), trello::ApiError> {
//! let client = TrelloClient::new("api-key", "token")?;
//! for board in client.list_boards()? {
//!     for list in board.open_lists()? {
//!         println!("{} / {}", board, list);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod resources;

#[cfg(test)]
mod testing;

pub use api::{
    ActionFilter, ActionType, ApiError, ApiRequest, Auth, HttpMethod, HttpRequest, HttpResponse,
    HttpTransport, ReqwestTransport, StatusFilter, TrelloClient, TrelloClientBuilder,
};
pub use config::Credentials;
pub use error::{Error, Result};
pub use resources::{Board, Card, List, Member};
