//! Deck queries: the user's deck list, deck contents and card membership.

use serde_json::Value;

use crate::config::endpoints;
use crate::error::{MagicSearchError, Result};
use crate::gate::Authorized;
use crate::models::{
    CardRef, CreateDeckRequest, Deck, DeckCardRequest, DeckCardsResponse, DeckIdRequest,
    DeckListResponse,
};
use crate::MagicSearchClient;

/// Deck type sent when the caller does not choose one.
pub const DEFAULT_DECK_TYPE: &str = "Casual";

// ---------------------------------------------------------------------------
// DeckQuery
// ---------------------------------------------------------------------------

/// Query interface for the authorized user's decks.
pub struct DeckQuery<'a> {
    client: &'a MagicSearchClient,
}

impl<'a> DeckQuery<'a> {
    /// Create a new `DeckQuery` bound to the given client.
    pub fn new(client: &'a MagicSearchClient) -> Self {
        Self { client }
    }

    /// List the user's decks, normalized to [`Deck`].
    pub fn list(&self, auth: &Authorized) -> Result<Vec<Deck>> {
        let query: Vec<(&str, String)> = auth
            .user_id()
            .map(|id| ("user_id", id.to_string()))
            .into_iter()
            .collect();
        let resp: DeckListResponse =
            self.client
                .transport()
                .get(endpoints::DECKS_FOR_USER, Some(auth.token()), &query)?;
        Ok(resp.into_decks())
    }

    /// Find one of the user's decks by id.
    pub fn get(&self, auth: &Authorized, deck_id: i64) -> Result<Option<Deck>> {
        Ok(self.list(auth)?.into_iter().find(|d| d.id == deck_id))
    }

    /// Create a deck named `name`.
    pub fn create(&self, auth: &Authorized, name: &str, deck_type: Option<&str>) -> Result<Value> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MagicSearchError::InvalidArgument(
                "deck name must not be empty".into(),
            ));
        }
        let body = CreateDeckRequest {
            user_id: auth.user_id(),
            name: name.to_string(),
            deck_type: deck_type.unwrap_or(DEFAULT_DECK_TYPE).to_string(),
        };
        self.client.transport().post(
            self.client.create_deck_route().path(),
            Some(auth.token()),
            &body,
        )
    }

    /// Delete a deck.
    pub fn delete(&self, auth: &Authorized, deck_id: i64) -> Result<Value> {
        self.client.transport().delete(
            endpoints::DECK_DELETE,
            Some(auth.token()),
            &DeckIdRequest { deck_id },
        )
    }

    /// List the cards in a deck.
    pub fn cards(&self, auth: &Authorized, deck_id: i64) -> Result<Vec<CardRef>> {
        let resp: DeckCardsResponse = self.client.transport().post(
            endpoints::DECK_READ,
            Some(auth.token()),
            &DeckIdRequest { deck_id },
        )?;
        Ok(resp.results)
    }

    /// Add a card to a deck.
    ///
    /// A card already in the deck comes back as a request failure whose
    /// detail mentions "already exists".
    pub fn add_card(&self, auth: &Authorized, deck_id: i64, card_id: i64) -> Result<Value> {
        self.client.transport().post(
            endpoints::DECK_CARD_ADD,
            Some(auth.token()),
            &DeckCardRequest { deck_id, card_id },
        )
    }

    /// Remove a card from a deck.
    pub fn remove_card(&self, auth: &Authorized, deck_id: i64, card_id: i64) -> Result<Value> {
        self.client.transport().delete(
            endpoints::DECK_CARD_REMOVE,
            Some(auth.token()),
            &DeckCardRequest { deck_id, card_id },
        )
    }
}
