//! Auth-gated page controllers.
//!
//! Each controller renders one page of the application as plain view-model
//! values: a [`HeaderView`], a page state, and [`Notice`]s for the blocking
//! messages a user must acknowledge. Controllers resolve the session when
//! they load, and every mutating action goes through the client's
//! authorization gate before any request is sent.

pub mod account;
pub mod decks;
pub mod favorites;
pub mod home;

pub use account::AccountController;
pub use decks::DecksController;
pub use favorites::FavoritesController;
pub use home::{HomeController, ResultTile, ResultsView};

use std::fmt;

use crate::error::{FailureKind, MagicSearchError};
use crate::MagicSearchClient;

/// A blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(t) | Notice::Warning(t) | Notice::Error(t) => t,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Turn a failed action into the notice shown to the user.
///
/// `action` completes "You need to be logged in to ..." and
/// "Failed to ... Please try again."
pub fn failure_notice(err: &MagicSearchError, action: &str) -> Notice {
    match err.kind() {
        FailureKind::AuthorizationAbsent => {
            Notice::Warning(format!("You need to be logged in to {action}"))
        }
        FailureKind::RequestFailed => {
            tracing::warn!(error = %err, action, "request failed");
            match err {
                MagicSearchError::InvalidArgument(msg) => Notice::Error(msg.clone()),
                _ => Notice::Error(
                    err.detail()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Failed to {action}. Please try again.")),
                ),
            }
        }
    }
}

/// The account area of the page header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
    LoggedIn { username: String },
    Anonymous,
}

impl HeaderView {
    pub fn resolve(client: &MagicSearchClient) -> Self {
        match client.session() {
            Some(session) => HeaderView::LoggedIn {
                username: session.username,
            },
            None => HeaderView::Anonymous,
        }
    }
}

impl fmt::Display for HeaderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderView::LoggedIn { username } => write!(f, "Hello, {username}"),
            HeaderView::Anonymous => f.write_str("Log In | Register"),
        }
    }
}

/// State of a gated list page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    /// Not loaded yet.
    Idle,
    /// No session: show the placeholder and hide actions and stats.
    AuthRequired,
    Empty,
    Loaded(Vec<T>),
    /// The list fetch failed; shown inline in place of the list.
    Error(String),
}

impl<T> PageState<T> {
    /// Whether action buttons and stats are visible.
    pub fn shows_actions(&self) -> bool {
        !matches!(self, PageState::AuthRequired | PageState::Idle)
    }

    /// Item counter shown in the page hero.
    pub fn count(&self) -> usize {
        match self {
            PageState::Loaded(items) => items.len(),
            _ => 0,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            PageState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub(crate) fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            PageState::Empty
        } else {
            PageState::Loaded(items)
        }
    }
}
