//! Application context built once at startup.
//!
//! [`AppContext`] carries the configuration, the catalog source, the search
//! orchestrator and the shared library to every call site that needs them.

use crate::catalog::{CatalogSource, HttpCatalog};
use crate::domain::error::Result;
use crate::infrastructure::paths::library_file;
use crate::search::SearchOrchestrator;
use crate::storage::{JsonStorage, Library, Storage};
use crate::Config;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared services for one bookfinder session.
pub struct AppContext {
    pub config: Config,
    pub catalog: Arc<dyn CatalogSource>,
    pub orchestrator: Arc<SearchOrchestrator>,
    library: Arc<Mutex<Library>>,
}

impl AppContext {
    /// Wires a context from explicit parts.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bookfinder::app::AppContext;
    /// use bookfinder::storage::MemoryStorage;
    /// use bookfinder::testing::ScriptedCatalog;
    /// use bookfinder::Config;
    /// use std::sync::Arc;
    ///
    /// let ctx = AppContext::new(
    ///     Config::default(),
    ///     Arc::new(ScriptedCatalog::default()),
    ///     Box::new(MemoryStorage::default()),
    /// );
    /// assert!(ctx.library().favorites().is_empty());
    /// ```
    #[must_use]
    pub fn new(config: Config, catalog: Arc<dyn CatalogSource>, storage: Box<dyn Storage>) -> Self {
        let orchestrator = Arc::new(SearchOrchestrator::new(Arc::clone(&catalog)));
        Self {
            config,
            catalog,
            orchestrator,
            library: Arc::new(Mutex::new(Library::open(storage))),
        }
    }

    /// Builds the production context: HTTP catalog plus a JSON library file
    /// under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the data
    /// directory cannot be created.
    pub fn open(config: Config) -> Result<Self> {
        let catalog = HttpCatalog::new(&config.catalog_host)?;
        let storage = JsonStorage::new(library_file(&config.data_dir))?;
        Ok(Self::new(config, Arc::new(catalog), Box::new(storage)))
    }

    /// Locks the library. A poisoned lock is recovered.
    pub fn library(&self) -> MutexGuard<'_, Library> {
        self.library.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle to the library for spawned tasks.
    #[must_use]
    pub fn shared_library(&self) -> Arc<Mutex<Library>> {
        Arc::clone(&self.library)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").field("config", &self.config).finish_non_exhaustive()
    }
}
