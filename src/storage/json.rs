//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable storage implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! An unreadable or malformed file is never fatal: the backend logs a warning
//! and starts from an empty document, which the next write replaces.

use crate::domain::error::{CatalogError, Result};
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// JSON storage container format.
///
/// This is the top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The whole document is kept in memory and written back on every change.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "favorites": [{ "key": "/works/OL1W", "title": "Dune", "author_names": [], "cover_id": null }],
///     "recentSearches": ["dune"],
///     "theme": "dark"
///   }
/// }
/// ```
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created. A missing,
    /// unreadable or malformed file yields an empty store instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bookfinder::storage::JsonStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonStorage::new(PathBuf::from("/tmp/bookfinder/library.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path).unwrap_or_else(|e| {
                tracing::warn!(path = ?file_path, error = %e, "discarding unreadable storage file");
                StorageData::default()
            })
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(entries = data.entries.len(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| CatalogError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version != FORMAT_VERSION {
            tracing::warn!(version = data.version, "unexpected storage format version");
        }
        tracing::debug!(version = data.version, entries = data.entries.len(), "loaded storage data");

        Ok(data)
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then renames it over the target path.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or renamed.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| CatalogError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let _span = tracing::debug_span!("json_set", key = %key).entered();

        self.data.entries.insert(key.to_string(), value);
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_remove", key = %key).entered();

        if self.data.entries.remove(key).is_some() {
            self.dirty = true;
        }
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("library.json");

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.set("theme", json!("dark")).unwrap();
        storage.set("recentSearches", json!(["dune"])).unwrap();
        drop(storage);

        let storage = JsonStorage::new(path).unwrap();
        assert_eq!(storage.get("theme").unwrap(), Some(json!("dark")));
        assert_eq!(storage.get("recentSearches").unwrap(), Some(json!(["dune"])));
    }

    #[test]
    fn test_remove_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.set("recentSearches", json!(["a"])).unwrap();
        storage.remove("recentSearches").unwrap();
        storage.remove("never-set").unwrap();
        drop(storage);

        let storage = JsonStorage::new(path).unwrap();
        assert_eq!(storage.get("recentSearches").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        assert_eq!(storage.get("favorites").unwrap(), None);

        storage.set("theme", json!("light")).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"version\": 1"));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.set("theme", json!("dark")).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
