//! Catalog source abstraction.
//!
//! This module defines the [`CatalogSource`] trait that abstracts over the
//! remote catalog, so the orchestrator and page loaders can run against the
//! HTTP client in production and against scripted sources in tests.
//!
//! Every call takes a [`CancellationToken`]. Once the token is cancelled the
//! pending call resolves to [`FetchOutcome::Aborted`] instead of a value or an
//! error, which is how superseded searches are absorbed without touching state.

use crate::domain::error::Result;
use crate::domain::{BookSummary, BookDetail};
use crate::catalog::wire::{AuthorWorksResponse, RawAuthor};
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

/// Result of a cancellable catalog call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The call ran to completion.
    Completed(T),
    /// The call was cancelled before its response was accepted.
    Aborted,
}

impl<T> FetchOutcome<T> {
    /// Returns the completed value, or `None` if aborted.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Aborted => None,
        }
    }

    /// Maps the completed value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            Self::Completed(value) => FetchOutcome::Completed(f(value)),
            Self::Aborted => FetchOutcome::Aborted,
        }
    }
}

/// Future returned by every [`CatalogSource`] method.
pub type CatalogFuture<T> = BoxFuture<'static, Result<FetchOutcome<T>>>;

/// Remote catalog lookups.
///
/// Implementations must be cheap to call concurrently: the returned futures
/// are `'static` and own everything they need.
pub trait CatalogSource: Send + Sync {
    /// Title search (`/search.json?title=`). Returns the full, uncapped list.
    fn search_titles(&self, query: &str, cancel: CancellationToken) -> CatalogFuture<Vec<BookSummary>>;

    /// Works listed under a subject (`/subjects/{name}.json?limit=50`).
    fn subject_works(&self, subject: &str, cancel: CancellationToken) -> CatalogFuture<Vec<BookSummary>>;

    /// Work detail (`/works/{id}.json`), already normalized.
    fn work_detail(&self, work_id: &str, cancel: CancellationToken) -> CatalogFuture<BookDetail>;

    /// Author profile (`/authors/{id}.json`).
    fn author(&self, author_id: &str, cancel: CancellationToken) -> CatalogFuture<RawAuthor>;

    /// Works by an author (`/authors/{id}/works.json?limit=20`).
    fn author_works(&self, author_id: &str, cancel: CancellationToken) -> CatalogFuture<AuthorWorksResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_helpers() {
        let done = FetchOutcome::Completed(2).map(|n| n * 10);
        assert_eq!(done, FetchOutcome::Completed(20));
        assert_eq!(done.completed(), Some(20));

        let aborted: FetchOutcome<i32> = FetchOutcome::Aborted;
        assert_eq!(aborted.map(|n| n + 1).completed(), None);
    }
}
