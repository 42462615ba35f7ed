use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://user-tajas-551109-user-8000.user.lab.sspcloud.fr";
pub const BASE_URL_ENV: &str = "MAGICSEARCH_API_URL";
pub const TOKEN_FILE: &str = "access_token";
pub const DEFAULT_SEARCH_LIMIT: u32 = 8;

/// Endpoint paths, relative to the API base URL.
pub mod endpoints {
    pub const LOGIN: &str = "login";
    pub const REGISTER: &str = "register";
    pub const SEARCH: &str = "search";
    pub const FILTER: &str = "filter";
    pub const HISTORY: &str = "history";
    pub const HISTORY_ADD: &str = "history/add";
    pub const FAVORITES: &str = "favorite";
    pub const FAVORITE_ADD: &str = "favorite/add";
    pub const FAVORITE_REMOVE: &str = "favorite/remove";
    pub const DECKS_FOR_USER: &str = "deck/user/read";
    pub const DECK_READ: &str = "deck/read";
    pub const DECK_DELETE: &str = "deck/delete";
    pub const DECK_CARD_ADD: &str = "deck/card/add";
    pub const DECK_CARD_REMOVE: &str = "deck/card/remove";
    pub const DECK_CREATE: &str = "deck/create";
    pub const DECK_PLAYER_CREATE: &str = "deck/player/create";
}

/// Which create-deck route the server exposes.
///
/// Both have been deployed; the player route is the more recent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateDeckRoute {
    #[default]
    Player,
    Plain,
}

impl CreateDeckRoute {
    pub fn path(self) -> &'static str {
        match self {
            CreateDeckRoute::Player => endpoints::DECK_PLAYER_CREATE,
            CreateDeckRoute::Plain => endpoints::DECK_CREATE,
        }
    }
}

pub fn default_token_dir() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("magicsearch")
    } else {
        PathBuf::from(".magicsearch")
    }
}

/// Base URL from the environment, if set and non-empty.
pub fn base_url_from_env() -> Option<String> {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
