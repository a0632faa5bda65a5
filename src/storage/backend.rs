//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait: a flat key-value contract over
//! JSON values. The library layer owns every key and its shape; backends only
//! persist what they are given.

use crate::domain::error::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// Abstraction over persistent key-value backends.
///
/// # Implementations
///
/// - [`crate::storage::JsonStorage`]: one JSON file with atomic writes (default)
/// - [`MemoryStorage`]: in-process map, nothing persisted
///
/// # Examples
///
/// ```
/// use bookfinder::storage::{MemoryStorage, Storage};
/// use serde_json::json;
///
/// let mut storage = MemoryStorage::default();
/// storage.set("theme", json!("dark"))?;
/// assert_eq!(storage.get("theme")?, Some(json!("dark")));
/// storage.remove("theme")?;
/// assert_eq!(storage.get("theme")?, None);
/// # Ok::<(), bookfinder::domain::CatalogError>(())
/// ```
pub trait Storage: Send {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replaces the value stored under `key` and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The in-memory value may already be
    /// updated when that happens.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Non-persistent backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, Value>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
