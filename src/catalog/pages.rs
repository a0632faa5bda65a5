//! Page loaders for browsing by category, author pages and full work pages.
//!
//! Each loader returns `None` when its token is cancelled (the page was left
//! before the data arrived), so the caller applies no state change, and
//! otherwise a terminal [`PageLoad`] with a fixed, user-facing failure message.

use crate::catalog::source::{CatalogSource, FetchOutcome};
use crate::catalog::wire::description_text;
use crate::domain::{AuthorPage, AuthorWork, BookDetail, BookSummary};
use futures_util::future::try_join;
use tokio_util::sync::CancellationToken;

/// Categories offered for browsing.
pub const CATEGORIES: [&str; 9] = [
    "fiction",
    "science",
    "history",
    "technology",
    "art",
    "biography",
    "children",
    "fantasy",
    "mystery",
];

/// Shown when a category listing cannot be fetched.
pub const CATEGORY_FAILED: &str = "Failed to load category.";
/// Shown when an author profile cannot be fetched.
pub const AUTHOR_FAILED: &str = "Failed to load author.";
/// Shown when a work page cannot be fetched.
pub const WORK_FAILED: &str = "Failed to load book details.";

/// Load state of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad<T> {
    Loading,
    Failed(String),
    Ready(T),
}

/// Capitalizes a category name for display (`"fiction"` → `"Fiction"`).
#[must_use]
pub fn category_title(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Loads the works listed under a subject.
pub async fn load_subject(
    source: &dyn CatalogSource,
    name: &str,
    cancel: CancellationToken,
) -> Option<PageLoad<Vec<BookSummary>>> {
    let result = source.subject_works(name, cancel.clone()).await;
    if cancel.is_cancelled() {
        return None;
    }

    match result {
        Ok(FetchOutcome::Completed(books)) => {
            tracing::debug!(subject = %name, count = books.len(), "category loaded");
            Some(PageLoad::Ready(books))
        }
        Ok(FetchOutcome::Aborted) => None,
        Err(e) => {
            tracing::warn!(subject = %name, error = %e, "category load failed");
            Some(PageLoad::Failed(CATEGORY_FAILED.to_string()))
        }
    }
}

/// Loads an author profile and their works concurrently. Both must succeed.
pub async fn load_author(
    source: &dyn CatalogSource,
    author_id: &str,
    cancel: CancellationToken,
) -> Option<PageLoad<AuthorPage>> {
    let result = try_join(
        source.author(author_id, cancel.clone()),
        source.author_works(author_id, cancel.clone()),
    )
    .await;
    if cancel.is_cancelled() {
        return None;
    }

    match result {
        Ok((FetchOutcome::Completed(profile), FetchOutcome::Completed(works))) => {
            let name = profile
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| author_id.to_string());
            let works: Vec<AuthorWork> = works.entries.into_iter().map(AuthorWork::from).collect();

            tracing::debug!(author_id = %author_id, works = works.len(), "author loaded");
            Some(PageLoad::Ready(AuthorPage {
                id: author_id.to_string(),
                name,
                bio: description_text(profile.bio.as_ref()),
                works,
            }))
        }
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(author_id = %author_id, error = %e, "author load failed");
            Some(PageLoad::Failed(AUTHOR_FAILED.to_string()))
        }
    }
}

/// Loads the full detail page of a work by its bare id (`OL45804W`).
pub async fn load_work(
    source: &dyn CatalogSource,
    work_id: &str,
    cancel: CancellationToken,
) -> Option<PageLoad<BookDetail>> {
    let result = source.work_detail(work_id, cancel.clone()).await;
    if cancel.is_cancelled() {
        return None;
    }

    match result {
        Ok(FetchOutcome::Completed(detail)) => Some(PageLoad::Ready(detail)),
        Ok(FetchOutcome::Aborted) => None,
        Err(e) => {
            tracing::warn!(work_id = %work_id, error = %e, "work load failed");
            Some(PageLoad::Failed(WORK_FAILED.to_string()))
        }
    }
}
