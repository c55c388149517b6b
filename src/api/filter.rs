//! Typed query filters.
//!
//! Trello takes filters as bare strings (`filter=open`,
//! `filter=createCard,updateCard`). These enums keep the accepted values
//! closed and convert to the wire form only when a request is built.

use std::fmt;

/// Open/closed filter for collections of lists and cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Open => "open",
            StatusFilter::Closed => "closed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-recorded action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Every action type.
    All,
    CreateCard,
    UpdateCard,
    DeleteCard,
    CopyCard,
    CommentCard,
    MoveCardToBoard,
    MoveCardFromBoard,
    AddMemberToCard,
    RemoveMemberFromCard,
    AddAttachmentToCard,
    AddChecklistToCard,
    UpdateCheckItemStateOnCard,
    CreateList,
    UpdateList,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::All => "all",
            ActionType::CreateCard => "createCard",
            ActionType::UpdateCard => "updateCard",
            ActionType::DeleteCard => "deleteCard",
            ActionType::CopyCard => "copyCard",
            ActionType::CommentCard => "commentCard",
            ActionType::MoveCardToBoard => "moveCardToBoard",
            ActionType::MoveCardFromBoard => "moveCardFromBoard",
            ActionType::AddMemberToCard => "addMemberToCard",
            ActionType::RemoveMemberFromCard => "removeMemberFromCard",
            ActionType::AddAttachmentToCard => "addAttachmentToCard",
            ActionType::AddChecklistToCard => "addChecklistToCard",
            ActionType::UpdateCheckItemStateOnCard => "updateCheckItemStateOnCard",
            ActionType::CreateList => "createList",
            ActionType::UpdateList => "updateList",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more action types, sent comma-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFilter(Vec<ActionType>);

impl ActionFilter {
    /// A filter matching any of `types`. Duplicates are dropped, order kept.
    pub fn new(types: impl IntoIterator<Item = ActionType>) -> Self {
        let mut unique = Vec::new();
        for t in types {
            if !unique.contains(&t) {
                unique.push(t);
            }
        }
        Self(unique)
    }

    pub fn types(&self) -> &[ActionType] {
        &self.0
    }

    /// The comma-joined wire form, e.g. `createCard,updateCard`.
    pub fn to_query_value(&self) -> String {
        self.0
            .iter()
            .map(ActionType::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for ActionFilter {
    fn default() -> Self {
        Self(vec![ActionType::CreateCard])
    }
}

impl From<ActionType> for ActionFilter {
    fn from(action: ActionType) -> Self {
        Self(vec![action])
    }
}
