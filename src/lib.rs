//! Bookfinder: search the Open Library catalog from the terminal.
//!
//! Bookfinder provides:
//! - Debounced title search with at most one authoritative request in flight
//! - Client-side filtering by cover, author, year range and language
//! - Work details, category browsing and author pages
//! - Persisted favorites, recent searches and theme preference

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal driver (main.rs, app/runtime)             │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Command parsing                                  │
//! │  - Event handling → actions                         │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search        │   │ Storage       │   │ UI            │
//! │ (search/)     │   │ (storage/)    │   │ (ui/)         │
//! │ - Debounce    │   │ - JSON file   │   │ - Rendering   │
//! │ - Orchestrator│   │ - Library     │   │ - Palettes    │
//! │ - Pipeline    │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Catalog (catalog/) and Domain (domain/)            │
//! │  - CatalogSource trait, reqwest client, wire types  │
//! │  - Book models, filters, errors                     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing + OpenTelemetry JSON-lines export        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Values come from an optional TOML file and CLI flags:
//!
//! ```toml
//! # ~/.config/bookfinder/config.toml
//! catalog_host = "https://openlibrary.org"
//! cover_host = "https://covers.openlibrary.org"
//! debounce_ms = 500
//! data_dir = "~/.local/share/bookfinder"
//! trace_level = "info"
//! ```
//!
//! # Example
//!
//! ```rust
//! use bookfinder::search::SearchOrchestrator;
//! use bookfinder::testing::ScriptedCatalog;
//! use bookfinder::domain::BookSummary;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = ScriptedCatalog::default();
//! catalog.set_results("dune", vec![BookSummary::new("/works/OL893415W", "Dune")]);
//!
//! let orchestrator = SearchOrchestrator::new(Arc::new(catalog));
//! orchestrator.search("  dune ").await;
//! assert_eq!(orchestrator.snapshot().results[0].title, "Dune");
//! # }
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod search;
pub mod storage;
pub mod testing;
pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppContext, Event, SessionState};
pub use domain::{CatalogError, Result};

use infrastructure::paths::{default_data_dir, expand_tilde};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default Open Library API host.
pub const DEFAULT_CATALOG_HOST: &str = "https://openlibrary.org";

/// Default cover image host.
pub const DEFAULT_COVER_HOST: &str = "https://covers.openlibrary.org";

/// Default debounce quiet period in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the catalog API. Default: `https://openlibrary.org`
    pub catalog_host: String,

    /// Base URL of the cover image service.
    pub cover_host: String,

    /// Quiet period before typed input is searched. Default: 500
    pub debounce_ms: u64,

    /// Directory holding the library store and span export.
    pub data_dir: PathBuf,

    /// Tracing level: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_host: DEFAULT_CATALOG_HOST.to_string(),
            cover_host: DEFAULT_COVER_HOST.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            data_dir: default_data_dir(),
            trace_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Builds a configuration from string key-value pairs.
    ///
    /// Unknown keys are ignored. Blank values and unparseable numbers fall back
    /// to defaults. `data_dir` expands a leading `~`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bookfinder::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("debounce_ms".to_string(), "250".to_string());
    /// map.insert("trace_level".to_string(), "debug".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.debounce_ms, 250);
    /// assert_eq!(config.trace_level, "debug");
    /// assert_eq!(config.catalog_host, "https://openlibrary.org");
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            catalog_host: get("catalog_host").map_or(defaults.catalog_host, String::from),
            cover_host: get("cover_host").map_or(defaults.cover_host, String::from),
            debounce_ms: get("debounce_ms")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.debounce_ms),
            data_dir: get("data_dir").map_or(defaults.data_dir, expand_tilde),
            trace_level: get("trace_level").map_or(defaults.trace_level, String::from),
        }
    }

    /// Reads a TOML file of top-level keys and applies [`Config::from_map`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Config`] if it is not valid TOML.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table: toml::Table = contents
            .parse()
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))?;

        let map = table
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    toml::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();

        Ok(Self::from_map(&map))
    }

    /// Debounce quiet period.
    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Builds the application context for `config`.
///
/// # Errors
///
/// Fails if the catalog host is invalid or the data directory cannot be
/// created.
pub fn initialize(config: Config) -> Result<AppContext> {
    tracing::debug!(catalog_host = %config.catalog_host, data_dir = ?config.data_dir, "initializing bookfinder");
    AppContext::open(config)
}
