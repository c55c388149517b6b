//! Trello cards.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::api::error::{ApiError, Result};
use crate::api::types::{Actions, CardDetail, CardResponse, CardSummary, Label};
use crate::api::{ActionFilter, ApiRequest, TrelloClient};

/// A single card.
///
/// Which attributes are populated depends on how the card was obtained:
/// board card listings carry only `name`, `closed` and `member_ids`, list
/// listings add `description` and `url`, and [`Card::fetch`] fills in
/// everything.
pub struct Card<'a> {
    client: &'a TrelloClient,
    id: String,
    name: Option<String>,
    description: Option<String>,
    closed: Option<bool>,
    url: Option<String>,
    member_ids: Option<Vec<String>>,
    short_id: Option<u64>,
    list_id: Option<String>,
    board_id: Option<String>,
    labels: Option<Vec<Label>>,
    badges: Option<Value>,
    actions: Option<Actions>,
}

impl<'a> Card<'a> {
    /// A card reference carrying only its id.
    pub fn new(client: &'a TrelloClient, id: impl Into<String>) -> Self {
        Self {
            client,
            id: id.into(),
            name: None,
            description: None,
            closed: None,
            url: None,
            member_ids: None,
            short_id: None,
            list_id: None,
            board_id: None,
            labels: None,
            badges: None,
            actions: None,
        }
    }

    pub(crate) fn from_summary(
        client: &'a TrelloClient,
        board_id: &str,
        summary: CardSummary,
    ) -> Self {
        let mut card = Self::new(client, summary.id);
        card.name = Some(summary.name);
        card.closed = Some(summary.closed);
        card.member_ids = Some(summary.id_members);
        card.board_id = Some(board_id.to_string());
        card
    }

    pub(crate) fn from_list_response(
        client: &'a TrelloClient,
        list_id: &str,
        board_id: &str,
        response: CardResponse,
    ) -> Self {
        let mut card = Self::new(client, response.id.clone());
        card.apply(response);
        card.list_id = Some(list_id.to_string());
        card.board_id = Some(board_id.to_string());
        card
    }

    fn apply(&mut self, response: CardResponse) {
        self.name = Some(response.name);
        self.description = Some(response.desc);
        self.closed = Some(response.closed);
        self.url = Some(response.url);
        self.member_ids = Some(response.id_members);
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

    /// Assigned member ids, in server order.
    pub fn member_ids(&self) -> Option<&[String]> {
        self.member_ids.as_deref()
    }

    pub fn short_id(&self) -> Option<u64> {
        self.short_id
    }

    pub fn list_id(&self) -> Option<&str> {
        self.list_id.as_deref()
    }

    pub fn board_id(&self) -> Option<&str> {
        self.board_id.as_deref()
    }

    pub fn labels(&self) -> Option<&[Label]> {
        self.labels.as_deref()
    }

    pub fn badges(&self) -> Option<&Value> {
        self.badges.as_ref()
    }

    /// Raw actions stored by the last [`Card::fetch_actions`] call.
    pub fn actions(&self) -> Option<&[Value]> {
        self.actions.as_deref()
    }

    pub fn client(&self) -> &'a TrelloClient {
        self.client
    }

    /// Fetch all attributes for this card.
    #[instrument(skip(self), fields(card_id = %self.id))]
    pub fn fetch(&mut self) -> Result<()> {
        let request = ApiRequest::get(format!("/cards/{}", self.id)).query("badges", false);
        let detail: CardDetail = self.client.fetch(&request)?;

        self.apply(detail.card);
        self.short_id = Some(detail.id_short);
        self.list_id = Some(detail.id_list);
        self.board_id = Some(detail.id_board);
        self.labels = Some(detail.labels);
        self.badges = Some(detail.badges);
        Ok(())
    }

    /// Fetch the actions recorded on this card and keep them on `self`.
    ///
    /// Pass `&ActionFilter::default()` for card creation events only.
    #[instrument(skip(self), fields(card_id = %self.id))]
    pub fn fetch_actions(&mut self, filter: &ActionFilter) -> Result<()> {
        let request = ApiRequest::get(format!("/cards/{}/actions", self.id))
            .query("filter", filter.to_query_value());
        let actions: Actions = self.client.fetch(&request)?;
        debug!("Fetched {} actions", actions.len());
        self.actions = Some(actions);
        Ok(())
    }

    /// When this card was created, taken from its `createCard` action.
    ///
    /// Fetches the card's creation actions first. The timestamp is truncated
    /// to whole seconds and expressed in UTC.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NoActions` if the server reports no creation
    /// action, and `ApiError::InvalidResponse` if the first action carries
    /// no parseable `date`.
    pub fn create_date(&mut self) -> Result<NaiveDateTime> {
        self.fetch_actions(&ActionFilter::default())?;

        let first = self
            .actions
            .as_ref()
            .and_then(|actions| actions.first())
            .ok_or_else(|| ApiError::NoActions {
                card_id: self.id.clone(),
            })?;

        let date = first.get("date").and_then(Value::as_str).ok_or_else(|| {
            ApiError::InvalidResponse(format!("action on card '{}' has no date", self.id))
        })?;

        parse_action_date(date)
    }

    /// Replace the description. The local value changes only once the
    /// server has accepted it.
    #[instrument(skip(self, description), fields(card_id = %self.id))]
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.set_remote_attribute("desc", json!(description))?;
        self.description = Some(description.to_string());
        Ok(())
    }

    /// Archive or unarchive the card. The local value changes only once the
    /// server has accepted it.
    #[instrument(skip(self), fields(card_id = %self.id))]
    pub fn set_closed(&mut self, closed: bool) -> Result<()> {
        self.set_remote_attribute("closed", json!(closed))?;
        self.closed = Some(closed);
        Ok(())
    }

    /// Delete this card permanently.
    ///
    /// Deleting an already-deleted card fails with
    /// `ApiError::ResourceUnavailable`.
    #[instrument(skip(self), fields(card_id = %self.id))]
    pub fn delete(&self) -> Result<()> {
        self.client
            .fetch_json(&ApiRequest::delete(format!("/cards/{}", self.id)))?;
        Ok(())
    }

    /// Add a member to this card.
    #[instrument(skip(self), fields(card_id = %self.id))]
    pub fn assign(&self, member_id: &str) -> Result<()> {
        let request = ApiRequest::post(format!("/cards/{}/members", self.id))
            .json(json!({ "value": member_id }));
        self.client.fetch_json(&request)?;
        Ok(())
    }

    #[instrument(skip(self, value), fields(card_id = %self.id))]
    fn set_remote_attribute(&self, attribute: &str, value: Value) -> Result<()> {
        let request = ApiRequest::put(format!("/cards/{}/{}", self.id, attribute))
            .json(json!({ "value": value }));
        self.client.fetch_json(&request)?;
        Ok(())
    }
}

/// Parse an action timestamp such as `2021-01-02T03:04:05.123Z`.
///
/// RFC 3339 values are converted to UTC. Values without an offset are taken
/// as UTC already. Sub-second precision is dropped either way.
fn parse_action_date(raw: &str) -> Result<NaiveDateTime> {
    let parsed = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.naive_utc(),
        Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map_err(|e| {
            ApiError::InvalidResponse(format!("unrecognized action date '{}': {}", raw, e))
        })?,
    };
    Ok(parsed.with_nanosecond(0).unwrap_or(parsed))
}

impl fmt::Debug for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("closed", &self.closed)
            .field("url", &self.url)
            .field("member_ids", &self.member_ids)
            .field("short_id", &self.short_id)
            .field("list_id", &self.list_id)
            .field("board_id", &self.board_id)
            .field("labels", &self.labels)
            .field("badges", &self.badges)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Card {}>", self.name.as_deref().unwrap_or(&self.id))
    }
}
