//! Transient overlays: card detail, deck contents and deck picker.
//!
//! Each overlay moves through `Absent -> Open -> Closing -> Absent`. While
//! open it holds a [`ListenerGuard`] for its Escape-key listener in the
//! page-wide [`ListenerRegistry`]; the guard is dropped the moment the
//! overlay starts closing, so listeners cannot outlive the overlay or pile up
//! across repeated opens.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::models::{CardRef, Deck};

/// Delay between starting to close and removal.
pub const CLOSE_DELAY: Duration = Duration::from_millis(300);

// ---------------------------------------------------------------------------
// ListenerRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Char(char),
}

#[derive(Default)]
struct Listeners {
    next: u64,
    entries: Vec<(u64, OverlayId)>,
}

/// Page-wide keydown listeners, one entry per open overlay.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Listeners>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an Escape listener for `owner`. It lives as long as the guard.
    pub fn register(&self, owner: OverlayId) -> ListenerGuard {
        let mut inner = self.inner.borrow_mut();
        inner.next += 1;
        let id = inner.next;
        inner.entries.push((id, owner));
        ListenerGuard {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Overlays whose listener fires for `key`, in registration order.
    pub fn dispatch(&self, key: Key) -> Vec<OverlayId> {
        if key != Key::Escape {
            return Vec::new();
        }
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|(_, owner)| *owner)
            .collect()
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live listeners registered by `owner`.
    pub fn count_for(&self, owner: OverlayId) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|(_, o)| *o == owner)
            .count()
    }

    fn next_overlay_id(&self) -> OverlayId {
        let mut inner = self.inner.borrow_mut();
        inner.next += 1;
        OverlayId(inner.next)
    }
}

/// Deregisters its listener on drop.
pub struct ListenerGuard {
    registry: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayContent {
    CardDetail { image_url: String, name: String },
    DeckContents { deck: Deck, cards: Vec<CardRef> },
    DeckPicker { card: CardRef, decks: Vec<Deck> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Absent,
    Open,
    Closing { remove_at: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseControl,
    ClickOutside,
    Escape,
}

/// Where a click inside an open overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Content,
}

pub struct Overlay {
    id: OverlayId,
    registry: ListenerRegistry,
    phase: OverlayPhase,
    content: Option<OverlayContent>,
    escape: Option<ListenerGuard>,
}

impl Overlay {
    pub fn new(registry: &ListenerRegistry) -> Self {
        Self {
            id: registry.next_overlay_id(),
            registry: registry.clone(),
            phase: OverlayPhase::Absent,
            content: None,
            escape: None,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == OverlayPhase::Open
    }

    pub fn content(&self) -> Option<&OverlayContent> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut OverlayContent> {
        self.content.as_mut()
    }

    /// Show `content`. Re-opening an open or closing overlay swaps the content
    /// and keeps a single listener.
    pub fn open(&mut self, content: OverlayContent) {
        self.content = Some(content);
        self.phase = OverlayPhase::Open;
        if self.escape.is_none() {
            self.escape = Some(self.registry.register(self.id));
        }
    }

    /// Start closing. The listener is released immediately; the content is
    /// removed once [`CLOSE_DELAY`] has passed (see [`tick`](Self::tick)).
    ///
    /// Returns `false` when the overlay was not open.
    pub fn close(&mut self, trigger: CloseTrigger, now: Instant) -> bool {
        if self.phase != OverlayPhase::Open {
            return false;
        }
        tracing::trace!(?trigger, "overlay closing");
        self.escape = None;
        self.phase = OverlayPhase::Closing {
            remove_at: now + CLOSE_DELAY,
        };
        true
    }

    /// Handle a click. Only a click on the backdrop closes the overlay.
    pub fn click(&mut self, target: ClickTarget, now: Instant) -> bool {
        match target {
            ClickTarget::Backdrop => self.close(CloseTrigger::ClickOutside, now),
            ClickTarget::Content => false,
        }
    }

    /// Advance time; finishes a pending close.
    pub fn tick(&mut self, now: Instant) {
        if let OverlayPhase::Closing { remove_at } = self.phase {
            if now >= remove_at {
                self.remove();
            }
        }
    }

    /// Drop the overlay immediately, whatever its phase.
    pub fn remove(&mut self) {
        self.escape = None;
        self.content = None;
        self.phase = OverlayPhase::Absent;
    }
}

// ---------------------------------------------------------------------------
// OverlayHost
// ---------------------------------------------------------------------------

/// Owns the overlays of one page.
///
/// The card-detail overlay is single-instance: a stray one is removed before
/// a new one opens. The deck overlays are created on first use and reused.
pub struct OverlayHost {
    registry: ListenerRegistry,
    card_detail: Option<Overlay>,
    deck_contents: Option<Overlay>,
    deck_picker: Option<Overlay>,
}

impl Default for OverlayHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayHost {
    pub fn new() -> Self {
        Self {
            registry: ListenerRegistry::new(),
            card_detail: None,
            deck_contents: None,
            deck_picker: None,
        }
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Show a card image. Any previous card-detail overlay is removed first.
    pub fn show_card(&mut self, image_url: &str, name: &str) -> &Overlay {
        if let Some(mut stray) = self.card_detail.take() {
            stray.remove();
        }
        let mut overlay = Overlay::new(&self.registry);
        overlay.open(OverlayContent::CardDetail {
            image_url: image_url.to_string(),
            name: name.to_string(),
        });
        self.card_detail.insert(overlay)
    }

    pub fn show_deck(&mut self, deck: Deck, cards: Vec<CardRef>) -> &Overlay {
        let overlay = self
            .deck_contents
            .get_or_insert_with(|| Overlay::new(&self.registry));
        overlay.open(OverlayContent::DeckContents { deck, cards });
        overlay
    }

    pub fn show_deck_picker(&mut self, card: CardRef, decks: Vec<Deck>) -> &Overlay {
        let overlay = self
            .deck_picker
            .get_or_insert_with(|| Overlay::new(&self.registry));
        overlay.open(OverlayContent::DeckPicker { card, decks });
        overlay
    }

    pub fn card_detail(&self) -> Option<&Overlay> {
        self.card_detail.as_ref()
    }

    pub fn card_detail_mut(&mut self) -> Option<&mut Overlay> {
        self.card_detail.as_mut()
    }

    pub fn deck_contents(&self) -> Option<&Overlay> {
        self.deck_contents.as_ref()
    }

    pub fn deck_contents_mut(&mut self) -> Option<&mut Overlay> {
        self.deck_contents.as_mut()
    }

    pub fn deck_picker(&self) -> Option<&Overlay> {
        self.deck_picker.as_ref()
    }

    pub fn deck_picker_mut(&mut self) -> Option<&mut Overlay> {
        self.deck_picker.as_mut()
    }

    /// Deliver a key press to the registered listeners.
    pub fn press_key(&mut self, key: Key, now: Instant) {
        for owner in self.registry.dispatch(key) {
            if let Some(overlay) = self.overlay_mut(owner) {
                overlay.close(CloseTrigger::Escape, now);
            }
        }
    }

    /// Advance time for every overlay.
    pub fn tick(&mut self, now: Instant) {
        for overlay in [
            &mut self.card_detail,
            &mut self.deck_contents,
            &mut self.deck_picker,
        ]
        .into_iter()
        .flatten()
        {
            overlay.tick(now);
        }
    }

    fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        [
            &mut self.card_detail,
            &mut self.deck_contents,
            &mut self.deck_picker,
        ]
        .into_iter()
        .flatten()
        .find(|o| o.id() == id)
    }
}
