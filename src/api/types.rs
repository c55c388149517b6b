//! Trello API response shapes.
//!
//! Each struct lists exactly the fields a given endpoint must return for
//! hydration to succeed. A missing required field fails deserialization and
//! surfaces as `ApiError::InvalidResponse`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A board as returned by `GET /boards/{id}` and `GET /members/me/boards`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardResponse {
    pub id: String,
    pub name: String,
    /// Absent from some responses; treated as empty.
    #[serde(default)]
    pub desc: String,
    pub closed: bool,
    pub url: String,
}

/// A list as returned by `GET /lists/{id}` and `GET /boards/{id}/lists`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub id: String,
    pub name: String,
    pub closed: bool,
    #[serde(default)]
    pub id_board: Option<String>,
}

/// The card subset returned by `GET /boards/{id}/cards`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: String,
    pub name: String,
    pub closed: bool,
    pub id_members: Vec<String>,
}

/// The card shape returned by `GET /lists/{id}/cards` and card creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub closed: bool,
    pub url: String,
    pub id_members: Vec<String>,
}

/// The full card returned by `GET /cards/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetail {
    #[serde(flatten)]
    pub card: CardResponse,
    pub id_short: u64,
    pub id_list: String,
    pub id_board: String,
    pub labels: Vec<Label>,
    /// Passed through untouched.
    pub badges: Value,
}

/// A label attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Fields not modelled above, e.g. `idBoard` and `uses`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A member as returned by `GET /members/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    pub full_name: String,
    pub initials: String,
    pub status: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub url: String,
}

/// Raw action records, kept as opaque JSON.
pub type Actions = Vec<Value>;
