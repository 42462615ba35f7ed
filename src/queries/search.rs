//! Card search: the semantic `/search` endpoint and the structured `/filter` one.

use crate::config::endpoints;
use crate::error::{MagicSearchError, Result};
use crate::models::{FilterRequest, SearchFilters, SearchRequest, SearchResponse};
use crate::MagicSearchClient;

// ---------------------------------------------------------------------------
// SearchQuery
// ---------------------------------------------------------------------------

/// Query interface for card search.
///
/// Search does not require a session, but the bearer token is attached when
/// one exists.
pub struct SearchQuery<'a> {
    client: &'a MagicSearchClient,
}

impl<'a> SearchQuery<'a> {
    /// Create a new `SearchQuery` bound to the given client.
    pub fn new(client: &'a MagicSearchClient) -> Self {
        Self { client }
    }

    /// Free-text semantic search. Sends `{text, limit}` and nothing else.
    pub fn semantic(&self, text: &str, limit: u32) -> Result<SearchResponse> {
        self.send(&SearchRequest {
            text: text.to_string(),
            limit,
            filters: None,
        })
    }

    /// Semantic search narrowed by a filter set.
    ///
    /// The `filters` object is always sent, even when empty.
    pub fn semantic_filtered(
        &self,
        text: &str,
        limit: u32,
        filters: &SearchFilters,
    ) -> Result<SearchResponse> {
        self.send(&SearchRequest {
            text: text.to_string(),
            limit,
            filters: Some(filters.clone()),
        })
    }

    /// Send a prepared search request.
    pub fn send(&self, request: &SearchRequest) -> Result<SearchResponse> {
        if request.text.trim().is_empty() {
            return Err(MagicSearchError::InvalidArgument(
                "search text must not be empty".into(),
            ));
        }
        let token = self.client.sessions().token();
        self.client
            .transport()
            .post(endpoints::SEARCH, token.as_deref(), request)
    }

    /// Structured search on filters alone, without a text prompt.
    pub fn structured(&self, filters: &SearchFilters, limit: u32) -> Result<SearchResponse> {
        let token = self.client.sessions().token();
        let body = FilterRequest {
            filters: filters.clone(),
            limit,
        };
        self.client
            .transport()
            .post(endpoints::FILTER, token.as_deref(), &body)
    }
}
