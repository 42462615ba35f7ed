use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::card::{flexible_id, flexible_opt_id, CardRef};

// ---------------------------------------------------------------------------
// Deck: A user's named card collection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub deck_type: Option<String>,
}

/// A deck entry as the server sends it.
///
/// Different server revisions send `id` or `deck_id`, `name` or `deck_name`,
/// ids as numbers or numeric strings, and sometimes only the bare id. All
/// shapes are accepted and normalized by [`RawDeck::normalize`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDeck {
    Id(#[serde(deserialize_with = "flexible_id")] i64),
    Record(DeckRecord),
    Other(Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckRecord {
    #[serde(default, deserialize_with = "flexible_opt_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "flexible_opt_id")]
    pub deck_id: Option<i64>,
    #[serde(rename = "deckId", default, deserialize_with = "flexible_opt_id")]
    pub deck_id_camel: Option<i64>,
    pub name: Option<String>,
    pub deck_name: Option<String>,
    #[serde(rename = "deckName")]
    pub deck_name_camel: Option<String>,
    #[serde(rename = "type")]
    pub deck_type: Option<String>,
}

impl RawDeck {
    /// Normalize to a [`Deck`].
    ///
    /// Entries without a usable server id yield `None`.
    pub fn normalize(self) -> Option<Deck> {
        match self {
            RawDeck::Id(id) => Some(Deck {
                id,
                name: format!("Deck {id}"),
                deck_type: None,
            }),
            RawDeck::Record(r) => {
                let Some(id) = r.deck_id.or(r.id).or(r.deck_id_camel) else {
                    tracing::warn!(name = ?r.name, "skipping deck entry without an id");
                    return None;
                };
                let name = r
                    .name
                    .or(r.deck_name)
                    .or(r.deck_name_camel)
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| format!("Deck {id}"));
                Some(Deck {
                    id,
                    name,
                    deck_type: r.deck_type,
                })
            }
            RawDeck::Other(value) => {
                tracing::warn!(entry = %value, "skipping unreadable deck entry");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckListResponse {
    #[serde(default)]
    pub results: Vec<RawDeck>,
}

impl DeckListResponse {
    pub fn into_decks(self) -> Vec<Deck> {
        self.results
            .into_iter()
            .filter_map(RawDeck::normalize)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckCardsResponse {
    #[serde(default)]
    pub results: Vec<CardRef>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CreateDeckRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub deck_type: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeckIdRequest {
    pub deck_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeckCardRequest {
    pub deck_id: i64,
    pub card_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CardIdRequest {
    pub card_id: i64,
}
