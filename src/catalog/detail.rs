//! Work detail lookup.
//!
//! Detail is supplementary to the search flow: a malformed key, a transport
//! failure or a cancelled call all degrade to `None`, and nothing here touches
//! the orchestrator's result state.

use crate::catalog::source::{CatalogSource, FetchOutcome};
use crate::domain::error::{CatalogError, Result};
use crate::domain::BookDetail;
use tokio_util::sync::CancellationToken;

/// A validated reference to a catalog work (`/works/<id>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkKey {
    id: String,
}

impl WorkKey {
    /// Parses a work key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidKey`] unless the key has the exact form
    /// `/works/<id>` with a non-empty id and no further path segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookfinder::catalog::WorkKey;
    ///
    /// assert_eq!(WorkKey::parse("/works/OL27448W").unwrap().id(), "OL27448W");
    /// assert!(WorkKey::parse("/books/OL1M").is_err());
    /// assert!(WorkKey::parse("/works/").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self> {
        let id = key
            .trim()
            .strip_prefix("/works/")
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .ok_or_else(|| CatalogError::InvalidKey(key.to_string()))?;
        Ok(Self { id: id.to_string() })
    }

    /// The bare work id (e.g. `OL27448W`).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Fetches and normalizes the detail of a work.
///
/// Returns `None` on a malformed key, on any fetch failure, or when `cancel`
/// fires before the response is accepted.
pub async fn fetch_details(
    source: &dyn CatalogSource,
    book_key: &str,
    cancel: CancellationToken,
) -> Option<BookDetail> {
    let key = match WorkKey::parse(book_key) {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!(book_key = %book_key, error = %e, "not a work key, skipping detail fetch");
            return None;
        }
    };

    match source.work_detail(key.id(), cancel.clone()).await {
        Ok(FetchOutcome::Completed(detail)) if !cancel.is_cancelled() => Some(detail),
        Ok(_) => {
            tracing::debug!(book_key = %book_key, "detail fetch aborted");
            None
        }
        Err(e) => {
            tracing::debug!(book_key = %book_key, error = %e, "detail fetch failed");
            None
        }
    }
}
