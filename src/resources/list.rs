//! Trello lists.

use std::fmt;

use serde_json::json;
use tracing::{debug, instrument};

use super::{Board, Card};
use crate::api::error::Result;
use crate::api::types::{Actions, CardResponse, ListResponse};
use crate::api::{ActionFilter, ApiRequest, TrelloClient};

/// A column on a board.
///
/// The owning board is referenced by id only; the list does not keep the
/// [`Board`] value alive.
pub struct List<'a> {
    client: &'a TrelloClient,
    id: String,
    board_id: String,
    name: Option<String>,
    closed: Option<bool>,
    actions: Option<Actions>,
}

impl<'a> List<'a> {
    /// A list reference on `board`, carrying only its id.
    pub fn new(board: &Board<'a>, id: impl Into<String>) -> Self {
        Self {
            client: board.client(),
            id: id.into(),
            board_id: board.id().to_string(),
            name: None,
            closed: None,
            actions: None,
        }
    }

    pub(crate) fn from_response(
        client: &'a TrelloClient,
        board_id: &str,
        response: ListResponse,
    ) -> Self {
        let mut list = Self {
            client,
            id: response.id.clone(),
            board_id: board_id.to_string(),
            name: None,
            closed: None,
            actions: None,
        };
        list.hydrate(response);
        list
    }

    fn hydrate(&mut self, response: ListResponse) {
        self.name = Some(response.name);
        self.closed = Some(response.closed);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn closed(&self) -> Option<bool> {
        self.closed
    }

    /// Raw actions stored by the last [`List::fetch_actions`] call.
    pub fn actions(&self) -> Option<&[serde_json::Value]> {
        self.actions.as_deref()
    }

    pub fn client(&self) -> &'a TrelloClient {
        self.client
    }

    /// Fetch all attributes for this list.
    #[instrument(skip(self), fields(list_id = %self.id))]
    pub fn fetch(&mut self) -> Result<()> {
        let response: ListResponse = self
            .client
            .fetch(&ApiRequest::get(format!("/lists/{}", self.id)))?;
        self.hydrate(response);
        Ok(())
    }

    /// All cards in this list.
    #[instrument(skip(self), fields(list_id = %self.id))]
    pub fn list_cards(&self) -> Result<Vec<Card<'a>>> {
        let cards: Vec<CardResponse> = self
            .client
            .fetch(&ApiRequest::get(format!("/lists/{}/cards", self.id)))?;
        debug!("Fetched {} cards", cards.len());

        Ok(cards
            .into_iter()
            .map(|c| Card::from_list_response(self.client, &self.id, &self.board_id, c))
            .collect())
    }

    /// Create a card at the bottom of this list.
    #[instrument(skip(self, desc), fields(list_id = %self.id))]
    pub fn add_card(&self, name: &str, desc: Option<&str>) -> Result<Card<'a>> {
        let request = ApiRequest::post(format!("/lists/{}/cards", self.id)).json(json!({
            "name": name,
            "idList": self.id,
            "desc": desc,
        }));
        let card: CardResponse = self.client.fetch(&request)?;
        Ok(Card::from_list_response(
            self.client,
            &self.id,
            &self.board_id,
            card,
        ))
    }

    /// Fetch the actions recorded on this list and keep them on `self`.
    #[instrument(skip(self), fields(list_id = %self.id))]
    pub fn fetch_actions(&mut self, filter: &ActionFilter) -> Result<()> {
        let request = ApiRequest::get(format!("/lists/{}/actions", self.id))
            .query("filter", filter.to_query_value());
        let actions: Actions = self.client.fetch(&request)?;
        debug!("Fetched {} actions", actions.len());
        self.actions = Some(actions);
        Ok(())
    }
}

impl fmt::Debug for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("id", &self.id)
            .field("board_id", &self.board_id)
            .field("name", &self.name)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for List<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<List {}>", self.name.as_deref().unwrap_or(&self.id))
    }
}
