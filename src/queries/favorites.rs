use serde_json::Value;

use crate::config::endpoints;
use crate::error::Result;
use crate::gate::Authorized;
use crate::models::{CardIdRequest, CardRef, FavoritesResponse};
use crate::MagicSearchClient;

/// Query interface for the authorized user's favorite cards.
pub struct FavoriteQuery<'a> {
    client: &'a MagicSearchClient,
}

impl<'a> FavoriteQuery<'a> {
    pub fn new(client: &'a MagicSearchClient) -> Self {
        Self { client }
    }

    pub fn list(&self, auth: &Authorized) -> Result<Vec<CardRef>> {
        let resp: FavoritesResponse =
            self.client
                .transport()
                .get(endpoints::FAVORITES, Some(auth.token()), &[])?;
        Ok(resp.favorites)
    }

    /// Mark a card as favorite. A repeat comes back as "already in favorites".
    pub fn add(&self, auth: &Authorized, card_id: i64) -> Result<Value> {
        self.client.transport().post(
            endpoints::FAVORITE_ADD,
            Some(auth.token()),
            &CardIdRequest { card_id },
        )
    }

    pub fn remove(&self, auth: &Authorized, card_id: i64) -> Result<Value> {
        self.client.transport().post(
            endpoints::FAVORITE_REMOVE,
            Some(auth.token()),
            &CardIdRequest { card_id },
        )
    }
}
