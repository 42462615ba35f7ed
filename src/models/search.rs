use serde::Serialize;

// ---------------------------------------------------------------------------
// Search request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub text: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

/// Filter set understood by both `/search` and `/filter`.
///
/// Unset fields are left out of the body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(rename = "mana_value__gte", skip_serializing_if = "Option::is_none")]
    pub mana_value_gte: Option<u32>,
    #[serde(rename = "mana_value__lte", skip_serializing_if = "Option::is_none")]
    pub mana_value_lte: Option<u32>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.mana_value_gte.is_none() && self.mana_value_lte.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterRequest {
    pub filters: SearchFilters,
    pub limit: u32,
}
