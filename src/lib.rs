//! Client SDK for the MagicSearch card search API.
//!
//! Wraps the remote REST API (semantic card search, decks, favorites and
//! search history) behind typed query interfaces, and owns the client-side
//! session contract: a bearer token kept in one of two storage scopes,
//! decoded for display identity and attached to every request.
//!
//! # Quick start
//!
//! ```no_run
//! use magicsearch_client::MagicSearchClient;
//!
//! let client = MagicSearchClient::builder()
//!     .base_url("http://localhost:8000")
//!     .build()
//!     .unwrap();
//!
//! // Anonymous semantic search
//! let hits = client.search().semantic("flying dragon", 8).unwrap();
//!
//! // Log in, then use the authorization gate for user-scoped calls
//! client.account().login("jace", "Secret123", false).unwrap();
//! let auth = client.authorize().unwrap();
//! let decks = client.decks().list(&auth).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod models;
pub mod overlay;
pub mod queries;
pub mod session;
pub mod storage;
pub mod transport;
pub mod view;

#[cfg(feature = "async")]
pub use async_client::AsyncMagicSearchClient;
pub use config::CreateDeckRoute;
pub use context::SearchContext;
pub use error::{AuthAbsence, FailureKind, MagicSearchError, Result};
pub use gate::{AuthGate, Authorized};
pub use session::{Session, SessionManager, SessionState};
pub use storage::{CredentialStore, StorageScope};
pub use transport::ApiTransport;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// MagicSearchClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`MagicSearchClient`].
///
/// Use [`MagicSearchClient::builder()`] to obtain a builder, chain
/// configuration methods, and call [`build()`](MagicSearchClientBuilder::build).
pub struct MagicSearchClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    token_dir: Option<PathBuf>,
    ephemeral: bool,
    create_deck_route: CreateDeckRoute,
}

impl Default for MagicSearchClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            token_dir: None,
            ephemeral: false,
            create_deck_route: CreateDeckRoute::default(),
        }
    }
}

impl MagicSearchClientBuilder {
    /// Set the API base URL.
    ///
    /// If not set, `MAGICSEARCH_API_URL` is consulted, then the built-in
    /// default.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory holding the persistent token file.
    ///
    /// Defaults to the platform config directory (e.g. `~/.config/magicsearch`
    /// on Linux).
    pub fn token_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.token_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep both token scopes in memory; nothing is written to disk.
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Choose the create-deck route the server exposes.
    pub fn create_deck_route(mut self, route: CreateDeckRoute) -> Self {
        self.create_deck_route = route;
        self
    }

    /// Build the client. No request is sent until the first query.
    pub fn build(self) -> Result<MagicSearchClient> {
        let base_url = self
            .base_url
            .or_else(config::base_url_from_env)
            .unwrap_or_else(|| config::DEFAULT_BASE_URL.to_string());
        let transport = ApiTransport::new(&base_url, self.timeout)?;

        let store = if self.ephemeral {
            CredentialStore::in_memory()
        } else {
            CredentialStore::on_disk(self.token_dir.unwrap_or_else(config::default_token_dir))
        };

        Ok(MagicSearchClient {
            transport,
            sessions: SessionManager::new(store),
            create_deck_route: self.create_deck_route,
        })
    }
}

// ---------------------------------------------------------------------------
// MagicSearchClient
// ---------------------------------------------------------------------------

/// The main entry point for the MagicSearch API.
///
/// Owns the HTTP transport and the [`SessionManager`], and exposes
/// domain-specific query interfaces as lightweight borrowing wrappers.
pub struct MagicSearchClient {
    transport: ApiTransport,
    sessions: SessionManager,
    create_deck_route: CreateDeckRoute,
}

impl MagicSearchClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> MagicSearchClientBuilder {
        MagicSearchClientBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Login, registration and logout.
    pub fn account(&self) -> queries::account::AccountQuery<'_> {
        queries::account::AccountQuery::new(self)
    }

    /// Semantic and structured card search.
    pub fn search(&self) -> queries::search::SearchQuery<'_> {
        queries::search::SearchQuery::new(self)
    }

    /// Deck management. Every method requires an [`Authorized`] capability.
    pub fn decks(&self) -> queries::decks::DeckQuery<'_> {
        queries::decks::DeckQuery::new(self)
    }

    /// Favorite cards. Every method requires an [`Authorized`] capability.
    pub fn favorites(&self) -> queries::favorites::FavoriteQuery<'_> {
        queries::favorites::FavoriteQuery::new(self)
    }

    /// Search prompt history. Every method requires an [`Authorized`] capability.
    pub fn history(&self) -> queries::history::HistoryQuery<'_> {
        queries::history::HistoryQuery::new(self)
    }

    // -- Session -----------------------------------------------------------

    /// The session manager backing this client.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// The authorization gate over this client's sessions.
    pub fn gate(&self) -> AuthGate<'_> {
        AuthGate::new(&self.sessions)
    }

    /// Shorthand for `self.gate().authorize()`.
    pub fn authorize(&self) -> Result<Authorized> {
        self.gate().authorize()
    }

    /// The current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.sessions.session()
    }

    // -- Internals ---------------------------------------------------------

    /// Return a reference to the underlying [`ApiTransport`] for advanced usage.
    pub fn transport(&self) -> &ApiTransport {
        &self.transport
    }

    pub fn create_deck_route(&self) -> CreateDeckRoute {
        self.create_deck_route
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for MagicSearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = self
            .session()
            .map(|s| s.username)
            .unwrap_or_else(|| "anonymous".to_string());
        write!(
            f,
            "MagicSearchClient(base_url={}, user={})",
            self.transport.base_url(),
            user
        )
    }
}
