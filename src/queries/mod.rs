//! Query modules for the MagicSearch client.
//!
//! Each module provides a query struct that borrows from a
//! [`MagicSearchClient`](crate::MagicSearchClient) and exposes methods
//! returning `Result<T>`. Every method issues exactly one request.
//! User-scoped methods take an [`Authorized`](crate::Authorized) capability,
//! so the session check happens before the request is built.

pub mod account;
pub mod decks;
pub mod favorites;
pub mod history;
pub mod search;

pub use account::{AccountQuery, Registration};
pub use decks::DeckQuery;
pub use favorites::FavoriteQuery;
pub use history::HistoryQuery;
pub use search::SearchQuery;
