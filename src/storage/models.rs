//! Persisted keys and small value types of the library store.

use serde::{Deserialize, Serialize};

/// Key of the favorites list (array of `FavoriteRecord`).
pub const FAVORITES_KEY: &str = "favorites";

/// Key of the recent searches list (array of strings, newest first).
pub const RECENTS_KEY: &str = "recentSearches";

/// Key of the theme preference (`"dark"` or `"light"`).
pub const THEME_KEY: &str = "theme";

/// Maximum number of recent searches kept.
pub const MAX_RECENTS: usize = 5;

/// Color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}
