//! Testing utilities for bookfinder
//!
//! This module provides [`ScriptedCatalog`], an in-memory [`CatalogSource`]
//! whose responses, failures and latencies are scripted per request. Combined
//! with a paused tokio clock it makes request races fully deterministic.

use crate::catalog::wire::{AuthorWorksResponse, RawAuthor};
use crate::catalog::{CatalogFuture, CatalogSource, FetchOutcome};
use crate::domain::error::{CatalogError, Result};
use crate::domain::{BookDetail, BookSummary};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Scripted reply to a title search.
#[derive(Debug, Clone)]
pub enum SearchReply {
    /// Respond with these books.
    Books(Vec<BookSummary>),
    /// Fail with a network-class error.
    NetworkError,
    /// Fail with a server-side error.
    ServerError,
}

#[derive(Debug, Default)]
struct Script {
    searches: HashMap<String, (SearchReply, Duration)>,
    subjects: HashMap<String, Vec<BookSummary>>,
    details: HashMap<String, BookDetail>,
    authors: HashMap<String, RawAuthor>,
    author_works: HashMap<String, AuthorWorksResponse>,
    search_requests: Vec<String>,
    detail_requests: Vec<String>,
    ignore_cancel: bool,
}

/// In-memory catalog with scripted responses
///
/// Unknown searches return an empty list; unknown subjects, works and authors
/// fail with a 404. Every search and detail request is recorded so tests can
/// assert what reached the "network".
///
/// # Examples
/// ```
/// # use bookfinder::testing::ScriptedCatalog;
/// # use bookfinder::domain::BookSummary;
/// let catalog = ScriptedCatalog::default();
/// catalog.set_results("dune", vec![BookSummary::new("/works/OL1W", "Dune")]);
/// assert!(catalog.search_requests().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedCatalog {
    script: Arc<Mutex<Script>>,
}

impl ScriptedCatalog {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Script an immediate successful search.
    pub fn set_results(&self, query: &str, books: Vec<BookSummary>) {
        self.script_search(query, SearchReply::Books(books), Duration::ZERO);
    }

    /// Script a search reply that resolves after `delay`.
    pub fn script_search(&self, query: &str, reply: SearchReply, delay: Duration) {
        self.script().searches.insert(query.to_string(), (reply, delay));
    }

    /// Make every call ignore its cancellation token and resolve anyway, like
    /// a transport that cannot be interrupted.
    pub fn ignore_cancellation(&self) {
        self.script().ignore_cancel = true;
    }

    pub fn set_subject(&self, name: &str, books: Vec<BookSummary>) {
        self.script().subjects.insert(name.to_string(), books);
    }

    pub fn set_detail(&self, work_id: &str, detail: BookDetail) {
        self.script().details.insert(work_id.to_string(), detail);
    }

    pub fn set_author(&self, author_id: &str, profile: RawAuthor, works: AuthorWorksResponse) {
        let mut script = self.script();
        script.authors.insert(author_id.to_string(), profile);
        script.author_works.insert(author_id.to_string(), works);
    }

    /// Script an author whose works listing fails.
    pub fn set_author_profile_only(&self, author_id: &str, profile: RawAuthor) {
        self.script().authors.insert(author_id.to_string(), profile);
    }

    /// Queries that reached the search endpoint, in order.
    #[must_use]
    pub fn search_requests(&self) -> Vec<String> {
        self.script().search_requests.clone()
    }

    /// Work ids that reached the detail endpoint, in order.
    #[must_use]
    pub fn detail_requests(&self) -> Vec<String> {
        self.script().detail_requests.clone()
    }

    fn respond<T>(&self, delay: Duration, cancel: CancellationToken, result: Result<T>) -> CatalogFuture<T>
    where
        T: Send + 'static,
    {
        let ignore_cancel = self.script().ignore_cancel;
        Box::pin(async move {
            if ignore_cancel {
                tokio::time::sleep(delay).await;
            } else {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Ok(FetchOutcome::Aborted),
                    () = tokio::time::sleep(delay) => {}
                }
            }
            result.map(FetchOutcome::Completed)
        })
    }
}

fn not_found(path: String) -> CatalogError {
    CatalogError::Status { status: 404, url: path }
}

impl CatalogSource for ScriptedCatalog {
    fn search_titles(&self, query: &str, cancel: CancellationToken) -> CatalogFuture<Vec<BookSummary>> {
        let (reply, delay) = {
            let mut script = self.script();
            script.search_requests.push(query.to_string());
            script
                .searches
                .get(query)
                .cloned()
                .unwrap_or((SearchReply::Books(Vec::new()), Duration::ZERO))
        };

        let result = match reply {
            SearchReply::Books(books) => Ok(books),
            SearchReply::NetworkError => Err(CatalogError::Unreachable("connection refused".to_string())),
            SearchReply::ServerError => Err(CatalogError::Status {
                status: 500,
                url: format!("/search.json?title={query}"),
            }),
        };
        self.respond(delay, cancel, result)
    }

    fn subject_works(&self, subject: &str, cancel: CancellationToken) -> CatalogFuture<Vec<BookSummary>> {
        let result = self
            .script()
            .subjects
            .get(subject)
            .cloned()
            .ok_or_else(|| not_found(format!("/subjects/{subject}.json")));
        self.respond(Duration::ZERO, cancel, result)
    }

    fn work_detail(&self, work_id: &str, cancel: CancellationToken) -> CatalogFuture<BookDetail> {
        let result = {
            let mut script = self.script();
            script.detail_requests.push(work_id.to_string());
            script
                .details
                .get(work_id)
                .cloned()
                .ok_or_else(|| not_found(format!("/works/{work_id}.json")))
        };
        self.respond(Duration::ZERO, cancel, result)
    }

    fn author(&self, author_id: &str, cancel: CancellationToken) -> CatalogFuture<RawAuthor> {
        let result = self
            .script()
            .authors
            .get(author_id)
            .cloned()
            .ok_or_else(|| not_found(format!("/authors/{author_id}.json")));
        self.respond(Duration::ZERO, cancel, result)
    }

    fn author_works(&self, author_id: &str, cancel: CancellationToken) -> CatalogFuture<AuthorWorksResponse> {
        let result = self
            .script()
            .author_works
            .get(author_id)
            .cloned()
            .ok_or_else(|| not_found(format!("/authors/{author_id}/works.json")));
        self.respond(Duration::ZERO, cancel, result)
    }
}

/// A minimal book with a publication year, for pipeline and search tests.
#[must_use]
pub fn book(key: &str, title: &str, year: Option<i32>) -> BookSummary {
    let mut book = BookSummary::new(key, title);
    book.first_publish_year = year;
    book
}
