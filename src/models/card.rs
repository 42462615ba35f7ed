use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// CardRef: A card as it appears in decks, favorites and search results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRef {
    #[serde(deserialize_with = "flexible_id")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: Option<u32>,
}

impl CardRef {
    /// Copies of the card held; the server omits the field for singletons.
    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }
}

// ---------------------------------------------------------------------------
// SearchHit: A card returned by the search endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub card: CardRef,
    /// Embedding distance to the query; lower is closer.
    pub distance: Option<f64>,
}

impl SearchHit {
    /// The caption shown under a result tile.
    pub fn caption(&self) -> String {
        match self.distance {
            Some(d) => format!("Distance: {d:.3}"),
            None => self.card.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FavoritesResponse {
    #[serde(default)]
    pub favorites: Vec<CardRef>,
}

/// Card ids arrive as numbers or numeric strings depending on the endpoint.
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        // i64::MAX as f64 rounds up to 2^63, hence the exclusive upper bound.
        Raw::Float(f) if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&f) => {
            Ok(f as i64)
        }
        Raw::Float(f) => Err(serde::de::Error::custom(format!("id {f} is not an i64 integer"))),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id {s:?}"))),
    }
}

/// [`flexible_id`] for optional fields; `null` decodes as `None`.
pub(crate) fn flexible_opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Id(#[serde(deserialize_with = "flexible_id")] i64);

    Ok(Option::<Id>::deserialize(deserializer)?.map(|Id(id)| id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_ids_accept_strings_and_numbers() {
        let a: CardRef = serde_json::from_value(json!({"id": 12, "name": "Shivan Dragon"})).unwrap();
        let b: CardRef = serde_json::from_value(json!({"id": "12", "name": "Shivan Dragon"})).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.quantity(), 1);
        assert!(serde_json::from_value::<CardRef>(json!({"id": "twelve"})).is_err());
    }

    #[test]
    fn float_ids_outside_i64_are_rejected() {
        let ok: CardRef = serde_json::from_value(json!({"id": 42.0})).unwrap();
        assert_eq!(ok.id, 42);
        assert!(serde_json::from_value::<CardRef>(json!({"id": 1.5})).is_err());
        assert!(serde_json::from_value::<CardRef>(json!({"id": 1e19})).is_err());
        assert!(serde_json::from_value::<CardRef>(json!({"id": -1e19})).is_err());
        assert!(serde_json::from_value::<CardRef>(json!({"id": 9223372036854775808.0})).is_err());
    }

    #[test]
    fn caption_uses_distance_when_present() {
        let hit: SearchHit = serde_json::from_value(json!({
            "id": 1, "name": "Shivan Dragon", "image_url": "https://img/1.jpg", "distance": 0.12345
        }))
        .unwrap();
        assert_eq!(hit.caption(), "Distance: 0.123");
        assert_eq!(hit.card.image_url.as_deref(), Some("https://img/1.jpg"));

        let hit: SearchHit = serde_json::from_value(json!({"id": 2, "name": "Ancient Dragon"})).unwrap();
        assert_eq!(hit.caption(), "Ancient Dragon");
    }
}
