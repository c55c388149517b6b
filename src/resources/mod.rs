//! Trello resources: boards, lists, cards and members.
//!
//! Every entity borrows the [`TrelloClient`](crate::api::TrelloClient) it was
//! created from. Attributes other than `id` are `None` until hydrated, either
//! by the accessor that produced the entity or by an explicit `fetch()`.

mod board;
mod card;
mod list;
mod member;

pub use board::Board;
pub use card::Card;
pub use list::List;
pub use member::Member;
