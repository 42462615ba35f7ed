use serde_json::Value;

use crate::config::endpoints;
use crate::error::{MagicSearchError, Result};
use crate::gate::Authorized;
use crate::models::{HistoryAddRequest, HistoryEntry, HistoryResponse};
use crate::MagicSearchClient;

/// Query interface for the authorized user's search history.
pub struct HistoryQuery<'a> {
    client: &'a MagicSearchClient,
}

impl<'a> HistoryQuery<'a> {
    pub fn new(client: &'a MagicSearchClient) -> Self {
        Self { client }
    }

    /// Past prompts in server order (oldest first).
    pub fn list(&self, auth: &Authorized) -> Result<Vec<HistoryEntry>> {
        let resp: HistoryResponse =
            self.client
                .transport()
                .get(endpoints::HISTORY, Some(auth.token()), &[])?;
        Ok(resp.history)
    }

    /// Append a prompt to the history log.
    pub fn add(&self, auth: &Authorized, prompt: &str) -> Result<Value> {
        if prompt.trim().is_empty() {
            return Err(MagicSearchError::InvalidArgument(
                "history prompt must not be empty".into(),
            ));
        }
        self.client.transport().post(
            endpoints::HISTORY_ADD,
            Some(auth.token()),
            &HistoryAddRequest {
                prompt: prompt.to_string(),
            },
        )
    }
}
