//! The decks page.

use std::time::Instant;

use crate::error::MagicSearchError;
use crate::models::Deck;
use crate::overlay::{CloseTrigger, OverlayContent, OverlayHost};
use crate::MagicSearchClient;

use super::home::add_card_notice;
use super::{failure_notice, HeaderView, Notice, PageState};

pub struct DecksController<'a> {
    client: &'a MagicSearchClient,
    state: PageState<Deck>,
    overlays: OverlayHost,
}

impl<'a> DecksController<'a> {
    pub fn new(client: &'a MagicSearchClient) -> Self {
        Self {
            client,
            state: PageState::Idle,
            overlays: OverlayHost::new(),
        }
    }

    pub fn header(&self) -> HeaderView {
        HeaderView::resolve(self.client)
    }

    pub fn state(&self) -> &PageState<Deck> {
        &self.state
    }

    pub fn overlays(&self) -> &OverlayHost {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut OverlayHost {
        &mut self.overlays
    }

    /// Resolve the session and load the deck list.
    pub fn load(&mut self) -> &PageState<Deck> {
        let auth = match self.client.authorize() {
            Ok(auth) => auth,
            Err(_) => {
                self.state = PageState::AuthRequired;
                return &self.state;
            }
        };
        self.state = match self.client.decks().list(&auth) {
            Ok(decks) => PageState::from_items(decks),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load decks");
                PageState::Error(format!("Error loading decks: {}", load_error_text(&e)))
            }
        };
        &self.state
    }

    /// Create a deck, then reload the list. `None` on success.
    pub fn create_deck(&mut self, name: &str) -> Option<Notice> {
        let outcome = self
            .client
            .authorize()
            .and_then(|auth| self.client.decks().create(&auth, name, None));
        match outcome {
            Ok(_) => {
                self.load();
                None
            }
            Err(e) => Some(failure_notice(&e, "create a deck")),
        }
    }

    /// Delete a deck, then reload the list. `None` on success.
    pub fn delete_deck(&mut self, deck_id: i64) -> Option<Notice> {
        let outcome = self
            .client
            .authorize()
            .and_then(|auth| self.client.decks().delete(&auth, deck_id));
        match outcome {
            Ok(_) => {
                self.load();
                None
            }
            Err(e) => Some(failure_notice(&e, "delete a deck")),
        }
    }

    /// Open the contents overlay for a deck.
    ///
    /// A failed card fetch is shown as an empty deck: the server answers
    /// empty decks with an error on some revisions.
    pub fn view_deck(&mut self, deck_id: i64) -> Option<Notice> {
        let auth = match self.client.authorize() {
            Ok(auth) => auth,
            Err(e) => return Some(failure_notice(&e, "view a deck")),
        };
        let deck = match self.client.decks().get(&auth, deck_id) {
            Ok(Some(deck)) => deck,
            Ok(None) => return Some(Notice::Error("Deck not found".into())),
            Err(e) => return Some(failure_notice(&e, "load deck")),
        };
        let cards = self
            .client
            .decks()
            .cards(&auth, deck_id)
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, deck_id, "no cards loaded; treating deck as empty");
                Vec::new()
            });
        self.overlays.show_deck(deck, cards);
        None
    }

    /// Add a card to a deck from the deck page.
    pub fn add_card(&mut self, deck_id: i64, card_id: i64) -> Notice {
        let notice = add_card_notice(self.client, deck_id, card_id);
        if matches!(notice, Notice::Info(_)) {
            self.refresh_open_deck(deck_id);
        }
        notice
    }

    /// Remove a card from a deck and refresh the open contents overlay.
    pub fn remove_card(&mut self, deck_id: i64, card_id: i64) -> Option<Notice> {
        let outcome = self
            .client
            .authorize()
            .and_then(|auth| self.client.decks().remove_card(&auth, deck_id, card_id));
        match outcome {
            Ok(_) => {
                self.refresh_open_deck(deck_id);
                None
            }
            Err(e) => Some(failure_notice(&e, "remove the card")),
        }
    }

    pub fn close_deck(&mut self, now: Instant) {
        if let Some(overlay) = self.overlays.deck_contents_mut() {
            overlay.close(CloseTrigger::CloseControl, now);
        }
    }

    /// Re-fetch the cards of `deck_id` if its overlay is showing.
    fn refresh_open_deck(&mut self, deck_id: i64) {
        let client = self.client;
        let Some(overlay) = self.overlays.deck_contents_mut() else {
            return;
        };
        if !overlay.is_open() {
            return;
        }
        let Some(OverlayContent::DeckContents { deck, cards }) = overlay.content_mut() else {
            return;
        };
        if deck.id != deck_id {
            return;
        }
        let fresh = client
            .authorize()
            .and_then(|auth| client.decks().cards(&auth, deck_id));
        match fresh {
            Ok(fresh) => *cards = fresh,
            Err(e) => tracing::warn!(error = %e, deck_id, "failed to refresh deck contents"),
        }
    }
}

fn load_error_text(err: &MagicSearchError) -> String {
    err.detail()
        .map(str::to_string)
        .unwrap_or_else(|| "Failed to load decks".to_string())
}
