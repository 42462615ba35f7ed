//! Per-page search state.
//!
//! Holds the last submitted query and the selected filters for one page
//! view. It is owned by the controller that renders that page and dropped
//! with it, so nothing survives navigation.

use crate::config::DEFAULT_SEARCH_LIMIT;
use crate::models::{SearchFilters, SearchRequest};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchContext {
    text: String,
    limit: u32,
    colors: Vec<String>,
    mana_min: Option<u32>,
    mana_max: Option<u32>,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self {
            text: String::new(),
            limit: DEFAULT_SEARCH_LIMIT,
            colors: Vec::new(),
            mana_min: None,
            mana_max: None,
        }
    }
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// True once a non-blank query has been submitted.
    pub fn has_query(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Set the result limit; zero falls back to the default.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = if limit == 0 { DEFAULT_SEARCH_LIMIT } else { limit };
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Toggle a color on or off, keeping selection order.
    ///
    /// Returns whether the color is selected afterwards.
    pub fn toggle_color(&mut self, color: &str) -> bool {
        let color = color.trim().to_uppercase();
        if let Some(pos) = self.colors.iter().position(|c| *c == color) {
            self.colors.remove(pos);
            false
        } else {
            self.colors.push(color);
            true
        }
    }

    pub fn set_mana_range(&mut self, min: Option<u32>, max: Option<u32>) {
        self.mana_min = min;
        self.mana_max = max;
    }

    pub fn mana_range(&self) -> (Option<u32>, Option<u32>) {
        (self.mana_min, self.mana_max)
    }

    /// Clear colors and mana bounds and restore the default limit.
    ///
    /// The query text is kept so the search can be re-run unfiltered.
    pub fn reset_filters(&mut self) {
        self.colors.clear();
        self.mana_min = None;
        self.mana_max = None;
        self.limit = DEFAULT_SEARCH_LIMIT;
    }

    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            colors: self.colors.clone(),
            mana_value_gte: self.mana_min,
            mana_value_lte: self.mana_max,
        }
    }

    /// The request for a plain submission: `{text, limit}` only.
    pub fn plain_request(&self) -> SearchRequest {
        SearchRequest {
            text: self.text.clone(),
            limit: self.limit,
            filters: None,
        }
    }

    /// The request for an "apply filters" submission; `filters` is always present.
    pub fn filtered_request(&self) -> SearchRequest {
        SearchRequest {
            text: self.text.clone(),
            limit: self.limit,
            filters: Some(self.filters()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toggling_a_color_twice_removes_it() {
        let mut ctx = SearchContext::new();
        assert!(ctx.toggle_color("r"));
        assert!(ctx.toggle_color("G"));
        assert!(!ctx.toggle_color("R"));
        assert_eq!(ctx.colors(), ["G".to_string()]);
    }

    #[test]
    fn reset_keeps_text_but_drops_filters() {
        let mut ctx = SearchContext::new();
        ctx.set_text("angel");
        ctx.set_limit(20);
        ctx.toggle_color("W");
        ctx.set_mana_range(Some(1), Some(4));

        ctx.reset_filters();
        assert_eq!(ctx.text(), "angel");
        assert_eq!(ctx.limit(), DEFAULT_SEARCH_LIMIT);
        assert!(ctx.filters().is_empty());
        assert_eq!(
            serde_json::to_value(ctx.filtered_request()).unwrap(),
            json!({"text": "angel", "limit": 8, "filters": {}})
        );
    }

    #[test]
    fn zero_limit_means_default() {
        let mut ctx = SearchContext::new();
        ctx.set_limit(0);
        assert_eq!(ctx.limit(), 8);
        assert!(!ctx.has_query());
        ctx.set_text("   ");
        assert!(!ctx.has_query());
    }
}
