//! The favorites page.

use crate::models::CardRef;
use crate::overlay::OverlayHost;
use crate::MagicSearchClient;

use super::{failure_notice, HeaderView, Notice, PageState};

pub struct FavoritesController<'a> {
    client: &'a MagicSearchClient,
    state: PageState<CardRef>,
    overlays: OverlayHost,
}

impl<'a> FavoritesController<'a> {
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

    pub fn state(&self) -> &PageState<CardRef> {
        &self.state
    }

    pub fn overlays(&self) -> &OverlayHost {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut OverlayHost {
        &mut self.overlays
    }

    pub fn load(&mut self) -> &PageState<CardRef> {
        let Ok(auth) = self.client.authorize() else {
            self.state = PageState::AuthRequired;
            return &self.state;
        };
        self.state = match self.client.favorites().list(&auth) {
            Ok(cards) => PageState::from_items(cards),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load favorites");
                PageState::Error(format!(
                    "Error loading favorites: {}",
                    e.detail().unwrap_or("Failed to load favorites")
                ))
            }
        };
        &self.state
    }

    /// Remove a favorite (already confirmed by the user) and reload the list.
    pub fn remove(&mut self, card_id: i64) -> Option<Notice> {
        let outcome = self
            .client
            .authorize()
            .and_then(|auth| self.client.favorites().remove(&auth, card_id));
        match outcome {
            Ok(_) => {
                self.load();
                None
            }
            Err(e) => Some(failure_notice(&e, "remove favorites")),
        }
    }

    /// Open the detail overlay for a listed favorite.
    pub fn open_card(&mut self, card_id: i64) -> bool {
        let Some(card) = self.state.items().iter().find(|c| c.id == card_id) else {
            return false;
        };
        let image = card.image_url.clone().unwrap_or_default();
        let name = card.name.clone();
        self.overlays.show_card(&image, &name);
        true
    }
}
