//! HTTP implementation of [`CatalogSource`] against the Open Library API.
//!
//! Each request is raced against its cancellation token with `tokio::select!`,
//! so a superseded call stops waiting on the network immediately and resolves
//! to [`FetchOutcome::Aborted`].

use crate::catalog::source::{CatalogFuture, CatalogSource, FetchOutcome};
use crate::catalog::wire::{AuthorWorksResponse, RawAuthor, RawWorkDetail, SearchResponse, SubjectResponse};
use crate::domain::error::{CatalogError, Result};
use crate::domain::{BookDetail, BookSummary};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Number of works requested for a subject page.
const SUBJECT_LIMIT: &str = "50";

/// Number of works requested for an author page.
const AUTHOR_WORKS_LIMIT: &str = "20";

/// Catalog client backed by `reqwest`.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base: Url,
}

impl HttpCatalog {
    /// Creates a client for the given catalog host (e.g. `https://openlibrary.org`).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if the host is not an absolute URL, or
    /// [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn new(catalog_host: &str) -> Result<Self> {
        let base = Url::parse(catalog_host)
            .map_err(|e| CatalogError::Config(format!("invalid catalog host {catalog_host:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::Config(format!("catalog host {catalog_host:?} cannot be a base URL")));
        }

        let client = Client::builder()
            .user_agent(concat!("bookfinder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base })
    }

    /// Builds `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get<T>(&self, url: Url, cancel: CancellationToken) -> CatalogFuture<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.client.clone();
        let span = tracing::debug_span!("catalog_get", url = %url);
        Box::pin(fetch_json(client, url, cancel).instrument(span))
    }
}

/// Performs a GET and decodes the JSON body, unless `cancel` fires first.
async fn fetch_json<T>(client: Client, url: Url, cancel: CancellationToken) -> Result<FetchOutcome<T>>
where
    T: DeserializeOwned,
{
    let request = async {
        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice::<T>(&body)?)
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!("request aborted");
            Ok(FetchOutcome::Aborted)
        }
        result = request => {
            if let Err(e) = &result {
                tracing::debug!(error = %e, "request failed");
            }
            result.map(FetchOutcome::Completed)
        }
    }
}

impl CatalogSource for HttpCatalog {
    fn search_titles(&self, query: &str, cancel: CancellationToken) -> CatalogFuture<Vec<BookSummary>> {
        let mut url = self.endpoint(&["search.json"]);
        url.query_pairs_mut().append_pair("title", query);

        let request = self.get::<SearchResponse>(url, cancel);
        Box::pin(async move {
            let outcome = request.await?;
            Ok(outcome.map(|response| response.docs.into_iter().map(BookSummary::from).collect()))
        })
    }

    fn subject_works(&self, subject: &str, cancel: CancellationToken) -> CatalogFuture<Vec<BookSummary>> {
        let mut url = self.endpoint(&["subjects", &format!("{subject}.json")]);
        url.query_pairs_mut().append_pair("limit", SUBJECT_LIMIT);

        let request = self.get::<SubjectResponse>(url, cancel);
        Box::pin(async move {
            let outcome = request.await?;
            Ok(outcome.map(|response| response.works.into_iter().map(BookSummary::from).collect()))
        })
    }

    fn work_detail(&self, work_id: &str, cancel: CancellationToken) -> CatalogFuture<BookDetail> {
        let url = self.endpoint(&["works", &format!("{work_id}.json")]);

        let request = self.get::<RawWorkDetail>(url, cancel);
        Box::pin(async move {
            let outcome = request.await?;
            Ok(outcome.map(BookDetail::from))
        })
    }

    fn author(&self, author_id: &str, cancel: CancellationToken) -> CatalogFuture<RawAuthor> {
        let url = self.endpoint(&["authors", &format!("{author_id}.json")]);
        self.get(url, cancel)
    }

    fn author_works(&self, author_id: &str, cancel: CancellationToken) -> CatalogFuture<AuthorWorksResponse> {
        let mut url = self.endpoint(&["authors", author_id, "works.json"]);
        url.query_pairs_mut().append_pair("limit", AUTHOR_WORKS_LIMIT);
        self.get(url, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_relative_host() {
        assert!(matches!(HttpCatalog::new("openlibrary"), Err(CatalogError::Config(_))));
        assert!(matches!(HttpCatalog::new("mailto:someone@example.org"), Err(CatalogError::Config(_))));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let catalog = HttpCatalog::new("https://openlibrary.org").unwrap();
        let url = catalog.endpoint(&["subjects", "science fiction.json"]);
        assert_eq!(url.as_str(), "https://openlibrary.org/subjects/science%20fiction.json");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let catalog = HttpCatalog::new("http://localhost:8080/mirror/").unwrap();
        let url = catalog.endpoint(&["works", "OL1W.json"]);
        assert_eq!(url.as_str(), "http://localhost:8080/mirror/works/OL1W.json");
    }

    #[tokio::test]
    async fn test_cancelled_request_is_aborted() {
        let catalog = HttpCatalog::new("http://127.0.0.1:9").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = catalog.search_titles("dune", cancel).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Aborted);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let catalog = HttpCatalog::new("http://127.0.0.1:9").unwrap();
        let err = catalog
            .search_titles("dune", CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_network());
    }
}
