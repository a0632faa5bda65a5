//! Search orchestration.
//!
//! [`SearchOrchestrator`] is the only writer of the search state. Each call to
//! [`SearchOrchestrator::begin`] synchronously cancels the request still
//! outstanding from the previous call and installs a fresh
//! [`CancellationToken`] as the authoritative one. Responses are checked against that token before any
//! state is touched, so a stale response can never overwrite a newer one.
//!
//! State is published through a `tokio::sync::watch` channel; observers get
//! whole [`SearchSnapshot`]s, never partial updates.

use crate::catalog::{CatalogSource, FetchOutcome};
use crate::domain::error::CatalogError;
use crate::domain::BookSummary;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Hard cap on the number of results kept per search.
pub const MAX_RESULTS: usize = 50;

/// Message shown when the catalog could not be reached.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: please check your connection.";

/// Message shown for any other failed search.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Observable search state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSnapshot {
    /// The trimmed query the current state belongs to.
    pub query: String,
    pub results: Vec<Arc<BookSummary>>,
    pub loading: bool,
    /// Empty when there is no error.
    pub error: String,
}

/// Maps a failed search to the text shown to the user.
#[must_use]
pub fn error_message(error: &CatalogError) -> &'static str {
    if error.is_network() {
        NETWORK_ERROR_MESSAGE
    } else {
        GENERIC_ERROR_MESSAGE
    }
}

/// A search issued by [`SearchOrchestrator::begin`] whose response is still
/// outstanding.
#[derive(Debug)]
#[must_use = "an issued search does nothing until it is completed"]
pub struct PendingSearch {
    query: String,
    token: CancellationToken,
}

impl PendingSearch {
    /// The trimmed query this search was issued for.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Coordinates title searches against a [`CatalogSource`].
pub struct SearchOrchestrator {
    source: Arc<dyn CatalogSource>,
    state: watch::Sender<SearchSnapshot>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl SearchOrchestrator {
    /// Creates an orchestrator with empty, idle state.
    #[must_use]
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        let (state, _) = watch::channel(SearchSnapshot::default());
        Self {
            source,
            state,
            in_flight: Mutex::new(None),
        }
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    fn in_flight(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancels the outstanding request and makes `next` authoritative.
    ///
    /// `None` leaves nothing in flight.
    fn supersede(in_flight: &mut Option<CancellationToken>, next: Option<CancellationToken>) {
        if let Some(previous) = in_flight.take() {
            previous.cancel();
        }
        *in_flight = next;
    }

    /// Issues a title search without waiting for it.
    ///
    /// The outstanding request is cancelled and `query` becomes authoritative
    /// before this returns, so the order of `begin` calls alone decides which
    /// search owns the state. A blank query clears the state and returns
    /// `None`; otherwise the returned [`PendingSearch`] must be driven by
    /// [`SearchOrchestrator::complete`].
    pub fn begin(&self, query: &str) -> Option<PendingSearch> {
        let query = query.trim().to_string();
        let mut in_flight = self.in_flight();

        if query.is_empty() {
            Self::supersede(&mut in_flight, None);
            self.state.send_replace(SearchSnapshot::default());
            tracing::debug!("empty query, results cleared");
            return None;
        }

        let token = CancellationToken::new();
        Self::supersede(&mut in_flight, Some(token.clone()));
        self.state.send_modify(|state| {
            state.query.clone_from(&query);
            state.loading = true;
            state.error.clear();
        });
        tracing::debug!(query = %query, "search issued");

        Some(PendingSearch { query, token })
    }

    /// Awaits the response of an issued search and publishes its terminal
    /// state, unless a later `begin` has superseded it.
    pub async fn complete(&self, pending: PendingSearch) {
        let PendingSearch { query, token } = pending;
        let span = tracing::debug_span!("search", query = %query);

        async {
            let outcome = self.source.search_titles(&query, token.clone()).await;

            // Response boundary: checked under the lock so a concurrent
            // `begin` cannot slip in between the check and the write.
            let _in_flight = self.in_flight();
            if token.is_cancelled() {
                tracing::debug!("superseded, response dropped");
                return;
            }

            match outcome {
                Ok(FetchOutcome::Completed(mut books)) => {
                    books.truncate(MAX_RESULTS);
                    tracing::info!(count = books.len(), "search completed");
                    self.state.send_modify(|state| {
                        state.results = books.into_iter().map(Arc::new).collect();
                        state.loading = false;
                        state.error.clear();
                    });
                }
                Ok(FetchOutcome::Aborted) => {
                    tracing::debug!("search aborted");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "search failed");
                    self.state.send_modify(|state| {
                        state.results.clear();
                        state.loading = false;
                        state.error = error_message(&e).to_string();
                    });
                }
            }
        }
        .instrument(span)
        .await;
    }

    /// Runs a title search and publishes its terminal state.
    ///
    /// Shorthand for [`begin`](Self::begin) followed by
    /// [`complete`](Self::complete). Resolves once this call's response (or
    /// its cancellation) has been handled. A call superseded by a later one
    /// resolves without changing any state.
    pub async fn search(&self, query: &str) {
        if let Some(pending) = self.begin(query) {
            self.complete(pending).await;
        }
    }

    /// Cancels any outstanding request without changing state.
    pub fn cancel(&self) {
        Self::supersede(&mut self.in_flight(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{book, ScriptedCatalog, SearchReply};
    use std::time::Duration;
    use tokio::time::sleep;

    fn titles(snapshot: &SearchSnapshot) -> Vec<String> {
        snapshot.results.iter().map(|b| b.title.clone()).collect()
    }

    fn slow(catalog: &ScriptedCatalog, query: &str, title: &str, millis: u64) {
        catalog.script_search(
            query,
            SearchReply::Books(vec![book(&format!("/works/{title}"), title, None)]),
            Duration::from_millis(millis),
        );
    }

    fn orchestrator(catalog: &ScriptedCatalog) -> SearchOrchestrator {
        SearchOrchestrator::new(Arc::new(catalog.clone()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_query_wins_when_older_response_is_slower() {
        let catalog = ScriptedCatalog::default();
        slow(&catalog, "dune", "Dune", 300);
        slow(&catalog, "emma", "Emma", 100);
        let orch = orchestrator(&catalog);

        tokio::join!(orch.search("dune"), async {
            sleep(Duration::from_millis(10)).await;
            orch.search("emma").await;
        });

        let state = orch.snapshot();
        assert_eq!(titles(&state), vec!["Emma"]);
        assert_eq!(state.query, "emma");
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_query_wins_when_older_response_arrives_last() {
        let catalog = ScriptedCatalog::default();
        catalog.ignore_cancellation();
        slow(&catalog, "dune", "Dune", 300);
        slow(&catalog, "emma", "Emma", 100);
        let orch = orchestrator(&catalog);

        tokio::join!(orch.search("dune"), async {
            sleep(Duration::from_millis(10)).await;
            orch.search("emma").await;
        });

        assert_eq!(titles(&orch.snapshot()), vec!["Emma"]);
        assert_eq!(catalog.search_requests(), vec!["dune", "emma"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_query_wins_when_older_response_is_faster() {
        let catalog = ScriptedCatalog::default();
        slow(&catalog, "dune", "Dune", 100);
        slow(&catalog, "emma", "Emma", 300);
        let orch = orchestrator(&catalog);

        tokio::join!(orch.search("dune"), async {
            sleep(Duration::from_millis(10)).await;
            orch.search("emma").await;
        });

        assert_eq!(titles(&orch.snapshot()), vec!["Emma"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_call_leaves_loading_to_the_new_call() {
        let catalog = ScriptedCatalog::default();
        catalog.ignore_cancellation();
        slow(&catalog, "dune", "Dune", 100);
        slow(&catalog, "emma", "Emma", 300);
        let orch = orchestrator(&catalog);

        tokio::join!(orch.search("dune"), async {
            sleep(Duration::from_millis(10)).await;
            orch.search("emma").await;
        }, async {
            // Stale "dune" response has landed, "emma" is still pending.
            sleep(Duration::from_millis(150)).await;
            let state = orch.snapshot();
            assert!(state.loading);
            assert!(state.results.is_empty());
        });

        assert!(!orch.snapshot().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_issue_order_decides_authority_not_poll_order() {
        let catalog = ScriptedCatalog::default();
        catalog.ignore_cancellation();
        slow(&catalog, "dune", "Dune", 100);
        slow(&catalog, "emma", "Emma", 100);
        let orch = orchestrator(&catalog);

        let older = orch.begin("dune").unwrap();
        let newer = orch.begin("  emma ").unwrap();
        assert_eq!(newer.query(), "emma");
        let state = orch.snapshot();
        assert_eq!(state.query, "emma");
        assert!(state.loading);

        tokio::join!(orch.complete(newer), orch.complete(older));

        let state = orch.snapshot();
        assert_eq!(titles(&state), vec!["Emma"]);
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_begin_clears_without_pending_search() {
        let catalog = ScriptedCatalog::default();
        let orch = orchestrator(&catalog);
        assert!(orch.begin("   ").is_none());
        assert_eq!(orch.snapshot(), SearchSnapshot::default());
        assert!(catalog.search_requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_is_set_while_in_flight() {
        let catalog = ScriptedCatalog::default();
        slow(&catalog, "dune", "Dune", 100);
        let orch = orchestrator(&catalog);
        let mut updates = orch.subscribe();

        tokio::join!(orch.search("dune"), async {
            sleep(Duration::from_millis(50)).await;
            assert!(orch.snapshot().loading);
        });

        assert!(updates.has_changed().unwrap());
        let state = updates.borrow_and_update().clone();
        assert!(!state.loading);
        assert_eq!(state.error, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_are_capped() {
        let catalog = ScriptedCatalog::default();
        let books = (0..60).map(|i| book(&format!("/works/OL{i}W"), "t", None)).collect();
        catalog.set_results("many", books);
        let orch = orchestrator(&catalog);

        orch.search("many").await;
        let state = orch.snapshot();
        assert_eq!(state.results.len(), MAX_RESULTS);
        assert_eq!(state.results[0].key, "/works/OL0W");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_makes_no_request() {
        let catalog = ScriptedCatalog::default();
        catalog.set_results("dune", vec![book("/works/OL1W", "Dune", None)]);
        let orch = orchestrator(&catalog);

        orch.search("dune").await;
        orch.search("   ").await;

        assert_eq!(catalog.search_requests(), vec!["dune"]);
        assert_eq!(orch.snapshot(), SearchSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_cancels_outstanding_request() {
        let catalog = ScriptedCatalog::default();
        slow(&catalog, "dune", "Dune", 200);
        let orch = orchestrator(&catalog);

        tokio::join!(orch.search("dune"), async {
            sleep(Duration::from_millis(10)).await;
            orch.search("").await;
        });

        let state = orch.snapshot();
        assert!(state.results.is_empty());
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_is_trimmed() {
        let catalog = ScriptedCatalog::default();
        let orch = orchestrator(&catalog);
        orch.search("  the hobbit ").await;
        assert_eq!(catalog.search_requests(), vec!["the hobbit"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_clears_results() {
        let catalog = ScriptedCatalog::default();
        catalog.set_results("dune", vec![book("/works/OL1W", "Dune", None)]);
        catalog.script_search("offline", SearchReply::NetworkError, Duration::ZERO);
        let orch = orchestrator(&catalog);

        orch.search("dune").await;
        orch.search("offline").await;

        let state = orch.snapshot();
        assert!(state.results.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, NETWORK_ERROR_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_failure_uses_generic_message_and_next_search_clears_it() {
        let catalog = ScriptedCatalog::default();
        catalog.script_search("broken", SearchReply::ServerError, Duration::ZERO);
        let orch = orchestrator(&catalog);

        orch.search("broken").await;
        assert_eq!(orch.snapshot().error, GENERIC_ERROR_MESSAGE);

        orch.search("nothing matches").await;
        let state = orch.snapshot();
        assert_eq!(state.error, "");
        assert!(state.results.is_empty());
    }
}
