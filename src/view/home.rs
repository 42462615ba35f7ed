//! The home page: search, filters, history, and per-result actions.

use std::time::Instant;

use crate::context::SearchContext;
use crate::error::MagicSearchError;
use crate::models::{CardRef, HistoryEntry, SearchHit, SearchRequest, SearchResponse};
use crate::overlay::{CloseTrigger, OverlayContent, OverlayHost};
use crate::MagicSearchClient;

use super::{failure_notice, HeaderView, Notice};

const NO_RESULTS: &str = "No cards found.";

/// One rendered search result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTile {
    pub card: CardRef,
    pub caption: String,
    /// Favorite / add-to-deck buttons are shown only with a session.
    pub actions: bool,
    /// Set once the card was added to favorites from this tile.
    pub favorited: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Idle,
    Tiles(Vec<ResultTile>),
    /// No results: the server's message or a default one.
    Message(String),
    Error(String),
}

impl ResultsView {
    pub fn tiles(&self) -> &[ResultTile] {
        match self {
            ResultsView::Tiles(tiles) => tiles,
            _ => &[],
        }
    }
}

/// History dropdown contents, most recent first.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Empty,
    Entries(Vec<HistoryEntry>),
}

impl HistoryView {
    pub const EMPTY_TEXT: &'static str = "No search history yet";
}

pub struct HomeController<'a> {
    client: &'a MagicSearchClient,
    context: SearchContext,
    results: ResultsView,
    overlays: OverlayHost,
}

impl<'a> HomeController<'a> {
    pub fn new(client: &'a MagicSearchClient) -> Self {
        Self {
            client,
            context: SearchContext::new(),
            results: ResultsView::Idle,
            overlays: OverlayHost::new(),
        }
    }

    pub fn header(&self) -> HeaderView {
        HeaderView::resolve(self.client)
    }

    pub fn context(&self) -> &SearchContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SearchContext {
        &mut self.context
    }

    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    pub fn overlays(&self) -> &OverlayHost {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut OverlayHost {
        &mut self.overlays
    }

    // -- Search ------------------------------------------------------------

    /// Submit the search bar.
    ///
    /// With a session the prompt is appended to history first; a history
    /// failure is logged and never blocks the search.
    pub fn submit_search(&mut self, text: &str, limit: Option<u32>) -> &ResultsView {
        self.prepare(text, limit);
        let request = self.context.plain_request();
        self.run(&request)
    }

    /// Submit the search bar with the filters already selected in
    /// [`context_mut`](Self::context_mut), as a single filtered request.
    pub fn submit_filtered_search(&mut self, text: &str, limit: Option<u32>) -> &ResultsView {
        self.prepare(text, limit);
        let request = self.context.filtered_request();
        self.run(&request)
    }

    fn prepare(&mut self, text: &str, limit: Option<u32>) {
        self.context.set_text(text);
        if let Some(limit) = limit {
            self.context.set_limit(limit);
        }

        if let Some(auth) = self.client.gate().try_authorize() {
            if let Err(e) = self.client.history().add(&auth, text) {
                tracing::warn!(error = %e, "failed to add search to history");
            }
        }
    }

    /// Re-run the last query with the selected filters.
    pub fn apply_filters(&mut self) -> Result<&ResultsView, Notice> {
        if !self.context.has_query() {
            return Err(Notice::Warning("Please perform a search first!".into()));
        }
        let request = self.context.filtered_request();
        Ok(self.run(&request))
    }

    /// Clear the filters and re-run the last query unfiltered.
    pub fn reset_filters(&mut self) -> &ResultsView {
        self.context.reset_filters();
        if self.context.has_query() {
            let request = self.context.filtered_request();
            self.run(&request);
        }
        &self.results
    }

    fn run(&mut self, request: &SearchRequest) -> &ResultsView {
        self.results = match self.client.search().send(request) {
            Ok(resp) => self.render(resp),
            Err(e) => {
                tracing::warn!(error = %e, "search failed");
                ResultsView::Error(
                    e.detail()
                        .map(str::to_string)
                        .unwrap_or_else(|| "Search failed. Please try again.".to_string()),
                )
            }
        };
        &self.results
    }

    fn render(&self, resp: SearchResponse) -> ResultsView {
        if resp.results.is_empty() {
            return ResultsView::Message(resp.message.unwrap_or_else(|| NO_RESULTS.to_string()));
        }
        let actions = self.client.session().is_some();
        ResultsView::Tiles(
            resp.results
                .into_iter()
                .map(|hit: SearchHit| ResultTile {
                    caption: hit.caption(),
                    card: hit.card,
                    actions,
                    favorited: false,
                })
                .collect(),
        )
    }

    // -- History -----------------------------------------------------------

    /// Load the history dropdown. `None` without a session or on failure.
    pub fn load_history(&self) -> Option<HistoryView> {
        let auth = self.client.gate().try_authorize()?;
        match self.client.history().list(&auth) {
            Ok(mut entries) if !entries.is_empty() => {
                entries.reverse();
                Some(HistoryView::Entries(entries))
            }
            Ok(_) => Some(HistoryView::Empty),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load history");
                None
            }
        }
    }

    /// Put a past prompt back into the search bar.
    pub fn use_history_entry(&mut self, entry: &HistoryEntry) {
        self.context.set_text(&entry.prompt);
    }

    // -- Card detail -------------------------------------------------------

    /// Open the detail overlay for the result tile at `index`.
    pub fn open_card(&mut self, index: usize) -> bool {
        let Some(tile) = self.results.tiles().get(index) else {
            return false;
        };
        let image = tile.card.image_url.clone().unwrap_or_default();
        let name = tile.card.name.clone();
        self.overlays.show_card(&image, &name);
        true
    }

    // -- Favorites ---------------------------------------------------------

    /// Add the card shown at tile `index` to favorites.
    ///
    /// A tile that already succeeded does not send a second request.
    pub fn add_to_favorites(&mut self, index: usize) -> Notice {
        let Some(tile) = self.results.tiles().get(index) else {
            return Notice::Error("No such result.".into());
        };
        if tile.favorited {
            return Notice::Info("Added to favorites".into());
        }
        let card_id = tile.card.id;

        let outcome = self
            .client
            .authorize()
            .and_then(|auth| self.client.favorites().add(&auth, card_id));
        match outcome {
            Ok(_) => {
                if let ResultsView::Tiles(tiles) = &mut self.results {
                    if let Some(tile) = tiles.get_mut(index) {
                        tile.favorited = true;
                    }
                }
                Notice::Info("Added to favorites".into())
            }
            Err(e) if e.detail_contains("already in favorites") => {
                Notice::Warning("This card is already in your favorites!".into())
            }
            Err(e) => failure_notice(&e, "add favorites"),
        }
    }

    // -- Add to deck -------------------------------------------------------

    /// Open the deck picker for the card at tile `index`.
    ///
    /// Returns a notice instead when there is no session, the deck list
    /// cannot be loaded, or the user has no decks yet.
    pub fn start_add_to_deck(&mut self, index: usize) -> Option<Notice> {
        let Some(card) = self.results.tiles().get(index).map(|t| t.card.clone()) else {
            return Some(Notice::Error("No such result.".into()));
        };
        let decks = match self
            .client
            .authorize()
            .and_then(|auth| self.client.decks().list(&auth))
        {
            Ok(decks) => decks,
            Err(e @ MagicSearchError::NotAuthorized(_)) => {
                return Some(failure_notice(&e, "add cards to a deck"))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load decks");
                return Some(Notice::Error("Failed to load decks. Please try again.".into()));
            }
        };
        if decks.is_empty() {
            return Some(Notice::Warning(
                "You need to create a deck first! Go to the Decks page to create one.".into(),
            ));
        }
        self.overlays.show_deck_picker(card, decks);
        None
    }

    /// Confirm the deck picker with `deck_id`.
    pub fn confirm_add_to_deck(&mut self, deck_id: i64, now: Instant) -> Notice {
        let card_id = match self.overlays.deck_picker().and_then(|o| o.content()) {
            Some(OverlayContent::DeckPicker { card, decks }) if decks.iter().any(|d| d.id == deck_id) => {
                card.id
            }
            Some(OverlayContent::DeckPicker { .. }) => {
                return Notice::Warning("Please select a deck".into())
            }
            _ => return Notice::Error("No card selected.".into()),
        };

        let notice = add_card_notice(self.client, deck_id, card_id);
        if let Some(picker) = self.overlays.deck_picker_mut() {
            picker.close(CloseTrigger::CloseControl, now);
        }
        notice
    }
}

/// Add a card to a deck and describe the outcome.
pub(crate) fn add_card_notice(client: &MagicSearchClient, deck_id: i64, card_id: i64) -> Notice {
    let outcome = client
        .authorize()
        .and_then(|auth| client.decks().add_card(&auth, deck_id, card_id));
    match outcome {
        Ok(_) => Notice::Info("Card successfully added to deck!".into()),
        Err(e) if e.detail_contains("already exists") => {
            Notice::Warning("This card is already in the selected deck!".into())
        }
        Err(e) => failure_notice(&e, "add cards to a deck"),
    }
}
