//! Favorites, recent searches and theme preference.
//!
//! [`Library`] is the single owner of this state. It loads everything once
//! from a [`Storage`] backend, keeps a working copy in memory, and writes each
//! change straight through. Malformed persisted values fall back to empty
//! defaults with a warning.

use crate::domain::error::Result;
use crate::domain::{BookSummary, FavoriteRecord};
use crate::storage::backend::Storage;
use crate::storage::models::{Theme, FAVORITES_KEY, MAX_RECENTS, RECENTS_KEY, THEME_KEY};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// In-memory view of the persisted favorites, recents and theme.
///
/// Every mutation is written through to the backing [`Storage`] before it
/// returns, so the stored copy never lags behind.
pub struct Library {
    storage: Box<dyn Storage>,
    favorites: Vec<FavoriteRecord>,
    recents: Vec<String>,
    theme: Theme,
}

/// Reads a list, skipping entries that do not decode. Anything other than an
/// array is treated as empty.
fn read_list<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Vec<T> {
    match storage.get(key) {
        Ok(None) => Vec::new(),
        Ok(Some(Value::Array(items))) => {
            let total = items.len();
            let list: Vec<T> = items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect();
            if list.len() < total {
                tracing::warn!(key = %key, skipped = total - list.len(), "skipped malformed entries");
            }
            list
        }
        Ok(Some(other)) => {
            tracing::warn!(key = %key, value = %other, "expected a list, using empty default");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "failed to read, using empty default");
            Vec::new()
        }
    }
}

fn read_theme(storage: &dyn Storage) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(Some(value)) => match serde_json::from_value(value.clone()) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!(key = THEME_KEY, value = %value, error = %e, "malformed theme, using default");
                Theme::default()
            }
        },
        Ok(None) => Theme::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read theme");
            Theme::default()
        }
    }
}

impl Library {
    /// Loads the library from `storage`. Never fails.
    #[must_use]
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let _span = tracing::debug_span!("library_open").entered();

        let favorites: Vec<FavoriteRecord> = read_list(storage.as_ref(), FAVORITES_KEY);
        let mut recents: Vec<String> = read_list(storage.as_ref(), RECENTS_KEY);
        recents.truncate(MAX_RECENTS);
        let theme = read_theme(storage.as_ref());

        tracing::debug!(favorites = favorites.len(), recents = recents.len(), theme = theme.as_str(), "library loaded");
        Self {
            storage,
            favorites,
            recents,
            theme,
        }
    }

    fn persist_favorites(&mut self) -> Result<()> {
        let value = serde_json::to_value(&self.favorites)?;
        self.storage.set(FAVORITES_KEY, value)
    }

    #[must_use]
    pub fn is_favorite(&self, key: &str) -> bool {
        self.favorites.iter().any(|f| f.key == key)
    }

    /// Favorites, newest first.
    #[must_use]
    pub fn favorites(&self) -> &[FavoriteRecord] {
        &self.favorites
    }

    /// Adds `book` at the front unless its key is already a favorite.
    ///
    /// Returns `true` if the list changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub fn add_favorite(&mut self, book: &BookSummary) -> Result<bool> {
        if self.is_favorite(&book.key) {
            return Ok(false);
        }
        self.favorites.insert(0, FavoriteRecord::from(book));
        tracing::debug!(key = %book.key, "favorite added");
        self.persist_favorites()?;
        Ok(true)
    }

    /// Removes every favorite with `key`. Returns `true` if the list changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub fn remove_favorite(&mut self, key: &str) -> Result<bool> {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.key != key);
        if self.favorites.len() == before {
            return Ok(false);
        }
        tracing::debug!(key = %key, "favorite removed");
        self.persist_favorites()?;
        Ok(true)
    }

    /// Adds or removes `book`; returns whether it is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub fn toggle_favorite(&mut self, book: &BookSummary) -> Result<bool> {
        if self.is_favorite(&book.key) {
            self.remove_favorite(&book.key)?;
            Ok(false)
        } else {
            self.add_favorite(book)?;
            Ok(true)
        }
    }

    /// Recent searches, newest first.
    #[must_use]
    pub fn list_recents(&self) -> &[String] {
        &self.recents
    }

    /// Records a search. Blank queries are ignored; an existing entry that
    /// matches case-insensitively moves to the front and keeps its stored
    /// spelling.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted.
    pub fn add_recent(&mut self, query: &str) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let lowered = query.to_lowercase();
        let entry = match self.recents.iter().position(|q| q.to_lowercase() == lowered) {
            Some(index) => self.recents.remove(index),
            None => query.to_string(),
        };
        self.recents.insert(0, entry);
        self.recents.truncate(MAX_RECENTS);

        let value = serde_json::to_value(&self.recents)?;
        self.storage.set(RECENTS_KEY, value)
    }

    /// Forgets all recent searches and deletes the persisted key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    pub fn clear_recents(&mut self) -> Result<()> {
        self.recents.clear();
        self.storage.remove(RECENTS_KEY)
    }

    /// Current theme preference.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flips the theme and persists it; returns the new theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be persisted.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.theme = self.theme.toggled();
        self.storage.set(THEME_KEY, Value::String(self.theme.as_str().to_string()))?;
        Ok(self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::MemoryStorage;
    use crate::storage::json::JsonStorage;
    use serde_json::json;
    use tempfile::TempDir;

    fn dune() -> BookSummary {
        let mut book = BookSummary::new("/works/OL893415W", "Dune");
        book.author_names = vec!["Frank Herbert".into()];
        book.languages = vec!["eng".into()];
        book
    }

    #[test]
    fn test_add_favorite_is_idempotent_and_prepends() {
        let mut library = Library::open(Box::new(MemoryStorage::default()));
        assert!(library.add_favorite(&dune()).unwrap());
        assert!(!library.add_favorite(&dune()).unwrap());
        library.add_favorite(&BookSummary::new("/works/OL2W", "Emma")).unwrap();

        let keys: Vec<&str> = library.favorites().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["/works/OL2W", "/works/OL893415W"]);
    }

    #[test]
    fn test_toggle_favorite() {
        let mut library = Library::open(Box::new(MemoryStorage::default()));
        assert!(library.toggle_favorite(&dune()).unwrap());
        assert!(library.is_favorite("/works/OL893415W"));
        assert!(!library.toggle_favorite(&dune()).unwrap());
        assert!(library.favorites().is_empty());
        assert!(!library.remove_favorite("/works/missing").unwrap());
    }

    #[test]
    fn test_recents_dedupe_case_insensitively_and_cap() {
        let mut library = Library::open(Box::new(MemoryStorage::default()));
        for q in ["one", "two", "three", "four", "five"] {
            library.add_recent(q).unwrap();
        }
        library.add_recent("  TWO ").unwrap();
        library.add_recent("six").unwrap();
        library.add_recent("   ").unwrap();

        assert_eq!(library.list_recents(), ["six", "two", "five", "four", "three"]);
    }

    #[test]
    fn test_recent_keeps_first_spelling() {
        let mut library = Library::open(Box::new(MemoryStorage::default()));
        library.add_recent("Dune").unwrap();
        assert_eq!(library.list_recents(), ["Dune"]);

        library.add_recent("dune").unwrap();
        assert_eq!(library.list_recents(), ["Dune"]);
        assert_eq!(library.storage.get(RECENTS_KEY).unwrap(), Some(json!(["Dune"])));
    }

    #[test]
    fn test_clear_recents_removes_key() {
        let mut storage = MemoryStorage::default();
        storage.set(RECENTS_KEY, json!(["dune"])).unwrap();
        let mut library = Library::open(Box::new(storage));
        assert_eq!(library.list_recents(), ["dune"]);

        library.clear_recents().unwrap();
        assert!(library.list_recents().is_empty());
        assert_eq!(library.storage.get(RECENTS_KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_values_fall_back_to_defaults() {
        let mut storage = MemoryStorage::default();
        storage.set(FAVORITES_KEY, json!({ "not": "a list" })).unwrap();
        storage.set(RECENTS_KEY, json!(["ok", 3, null])).unwrap();
        storage.set(THEME_KEY, json!("sepia")).unwrap();

        let library = Library::open(Box::new(storage));
        assert!(library.favorites().is_empty());
        assert_eq!(library.list_recents(), ["ok"]);
        assert_eq!(library.theme(), Theme::Light);
    }

    #[test]
    fn test_state_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");

        let mut library = Library::open(Box::new(JsonStorage::new(path.clone()).unwrap()));
        library.add_favorite(&dune()).unwrap();
        library.add_recent("dune").unwrap();
        assert_eq!(library.toggle_theme().unwrap(), Theme::Dark);
        drop(library);

        let library = Library::open(Box::new(JsonStorage::new(path).unwrap()));
        assert!(library.is_favorite("/works/OL893415W"));
        assert_eq!(library.favorites()[0].author_names, vec!["Frank Herbert".to_string()]);
        assert_eq!(library.list_recents(), ["dune"]);
        assert_eq!(library.theme(), Theme::Dark);
    }
}
