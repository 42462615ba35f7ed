//! Async wrapper around [`MagicSearchClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every client operation on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free of the
//! blocking HTTP client.
//!
//! # Example
//!
//! ```no_run
//! use magicsearch_client::AsyncMagicSearchClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AsyncMagicSearchClient::builder()
//!         .base_url("http://localhost:8000")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     // Run any sync client method via closure
//!     let hits = client
//!         .run(|c| c.search().semantic("angel", 8))
//!         .await
//!         .unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::CreateDeckRoute;
use crate::error::{MagicSearchError, Result};
use crate::models::SearchResponse;
use crate::session::Session;
use crate::MagicSearchClient;

// ---------------------------------------------------------------------------
// AsyncMagicSearchClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncMagicSearchClient`].
pub struct AsyncMagicSearchClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    token_dir: Option<PathBuf>,
    ephemeral: bool,
    create_deck_route: CreateDeckRoute,
}

impl Default for AsyncMagicSearchClientBuilder {
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

impl AsyncMagicSearchClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.token_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    pub fn create_deck_route(mut self, route: CreateDeckRoute) -> Self {
        self.create_deck_route = route;
        self
    }

    /// Build the client on the blocking pool; the blocking HTTP client must
    /// not be created on an async worker thread.
    pub async fn build(self) -> Result<AsyncMagicSearchClient> {
        tokio::task::spawn_blocking(move || {
            let mut builder = MagicSearchClient::builder()
                .timeout(self.timeout)
                .ephemeral(self.ephemeral)
                .create_deck_route(self.create_deck_route);
            if let Some(url) = self.base_url {
                builder = builder.base_url(url);
            }
            if let Some(dir) = self.token_dir {
                builder = builder.token_dir(dir);
            }
            let client = builder.build()?;
            Ok(AsyncMagicSearchClient {
                inner: Arc::new(client),
            })
        })
        .await
        .map_err(|e| MagicSearchError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncMagicSearchClient
// ---------------------------------------------------------------------------

/// Async wrapper around [`MagicSearchClient`].
///
/// All operations are dispatched to the blocking thread pool. Call
/// [`close()`](Self::close) to release the client off the async threads.
pub struct AsyncMagicSearchClient {
    inner: Arc<MagicSearchClient>,
}

impl AsyncMagicSearchClient {
    pub fn builder() -> AsyncMagicSearchClientBuilder {
        AsyncMagicSearchClientBuilder::default()
    }

    /// Run a sync client operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&MagicSearchClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| MagicSearchError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Semantic search, asynchronously.
    pub async fn search(&self, text: &str, limit: u32) -> Result<SearchResponse> {
        let text = text.to_string();
        self.run(move |c| c.search().semantic(&text, limit)).await
    }

    /// The current session, if any.
    pub async fn session(&self) -> Result<Option<Session>> {
        self.run(|c| Ok(c.session())).await
    }

    /// Release the client on the blocking pool.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            drop(self.inner);
            Ok(())
        })
        .await
        .map_err(|e| MagicSearchError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
