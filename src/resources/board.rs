//! Trello boards.

use std::fmt;

use serde_json::json;
use tracing::{debug, instrument};

use super::{Card, List};
use crate::api::error::Result;
use crate::api::types::{BoardResponse, CardSummary, ListResponse};
use crate::api::{ApiRequest, StatusFilter, TrelloClient};

/// A Trello board.
///
/// Attributes are held on the struct once fetched; lists and cards are always
/// an API call away.
pub struct Board<'a> {
    client: &'a TrelloClient,
    id: String,
    name: Option<String>,
    description: Option<String>,
    closed: Option<bool>,
    url: Option<String>,
}

impl<'a> Board<'a> {
    /// A board reference carrying only its id. Call [`Board::fetch`] to
    /// populate the remaining attributes.
    pub fn new(client: &'a TrelloClient, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            name: None,
            description: None,
            closed: None,
            url: None,
        }
    }

    pub(crate) fn from_response(client: &'a TrelloClient, response: BoardResponse) -> Self {
        let mut board = Self::new(client, response.id.clone());
        board.hydrate(response);
        board
    }

    fn hydrate(&mut self, response: BoardResponse) {
        self.name = Some(response.name);
        self.description = Some(response.desc);
        self.closed = Some(response.closed);
        self.url = Some(response.url);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn closed(&self) -> Option<bool> {
        self.closed
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn client(&self) -> &'a TrelloClient {
        self.client
    }

    /// Fetch all attributes for this board.
    #[instrument(skip(self), fields(board_id = %self.id))]
    pub fn fetch(&mut self) -> Result<()> {
        let response: BoardResponse = self
            .client
            .fetch(&ApiRequest::get(format!("/boards/{}", self.id)))?;
        self.hydrate(response);
        Ok(())
    }

    /// All lists on this board.
    pub fn all_lists(&self) -> Result<Vec<List<'a>>> {
        self.get_lists(StatusFilter::All)
    }

    /// Open lists on this board.
    pub fn open_lists(&self) -> Result<Vec<List<'a>>> {
        self.get_lists(StatusFilter::Open)
    }

    /// Closed lists on this board.
    pub fn closed_lists(&self) -> Result<Vec<List<'a>>> {
        self.get_lists(StatusFilter::Closed)
    }

    /// Lists matching `filter`, without their cards.
    #[instrument(skip(self), fields(board_id = %self.id))]
    pub fn get_lists(&self, filter: StatusFilter) -> Result<Vec<List<'a>>> {
        let request = ApiRequest::get(format!("/boards/{}/lists", self.id))
            .query("cards", "none")
            .query("filter", filter);
        let lists: Vec<ListResponse> = self.client.fetch(&request)?;
        debug!("Fetched {} lists", lists.len());

        Ok(lists
            .into_iter()
            .map(|l| List::from_response(self.client, &self.id, l))
            .collect())
    }

    /// Create a list on this board.
    #[instrument(skip(self), fields(board_id = %self.id))]
    pub fn add_list(&self, name: &str) -> Result<List<'a>> {
        let request = ApiRequest::post("/lists").json(json!({
            "name": name,
            "idBoard": self.id,
        }));
        let list: ListResponse = self.client.fetch(&request)?;
        Ok(List::from_response(self.client, &self.id, list))
    }

    /// All cards on this board.
    pub fn all_cards(&self) -> Result<Vec<Card<'a>>> {
        self.get_cards(StatusFilter::All)
    }

    /// Open cards on this board.
    pub fn open_cards(&self) -> Result<Vec<Card<'a>>> {
        self.get_cards(StatusFilter::Open)
    }

    /// Closed cards on this board.
    pub fn closed_cards(&self) -> Result<Vec<Card<'a>>> {
        self.get_cards(StatusFilter::Closed)
    }

    /// Cards matching `filter`.
    ///
    /// Only `id`, `name`, `closed` and `member_ids` are populated on the
    /// returned cards; call [`Card::fetch`] for the rest.
    #[instrument(skip(self), fields(board_id = %self.id))]
    pub fn get_cards(&self, filter: StatusFilter) -> Result<Vec<Card<'a>>> {
        let request =
            ApiRequest::get(format!("/boards/{}/cards", self.id)).query("filter", filter);
        let cards: Vec<CardSummary> = self.client.fetch(&request)?;
        debug!("Fetched {} cards", cards.len());

        Ok(cards
            .into_iter()
            .map(|c| Card::from_summary(self.client, &self.id, c))
            .collect())
    }
}

impl fmt::Debug for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("closed", &self.closed)
            .field("url", &self.url)
            .finish()
    }
}

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Board {}>", self.name.as_deref().unwrap_or(&self.id))
    }
}
