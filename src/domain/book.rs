//! Book domain models.
//!
//! This module defines the catalog entities the rest of the crate works with:
//! [`BookSummary`] for search and browse results, [`BookDetail`] for the
//! normalized work detail, [`FavoriteRecord`] for the persisted projection, and
//! the author page types. Wire formats live in [`crate::catalog::wire`]; these
//! types are what survives decoding.

use serde::{Deserialize, Serialize};

/// Placeholder image shown when a book has no cover.
pub const PLACEHOLDER_COVER_URL: &str = "https://via.placeholder.com/200x250?text=No+Cover";

/// A catalog work as returned by a search or subject lookup.
///
/// `key` (e.g. `/works/OL27448W`) is the stable identity used for
/// de-duplication, favoriting and linking. `author_ids` is aligned by index
/// with `author_names`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub key: String,
    pub title: String,
    pub author_names: Vec<String>,
    pub author_ids: Vec<String>,
    pub cover_id: Option<i64>,
    pub first_publish_year: Option<i32>,
    pub languages: Vec<String>,
}

impl BookSummary {
    /// Creates a summary with only a key and title set.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            author_names: Vec::new(),
            author_ids: Vec::new(),
            cover_id: None,
            first_publish_year: None,
            languages: Vec::new(),
        }
    }

    /// Year used for filtering and sorting; `0` when unknown.
    #[must_use]
    pub fn effective_year(&self) -> i32 {
        self.first_publish_year.unwrap_or(0)
    }

    /// Author names joined for display, or `"Unknown Author"`.
    #[must_use]
    pub fn authors_label(&self) -> String {
        authors_label(&self.author_names)
    }
}

/// Joins author names for display; `"Unknown Author"` when there are none.
#[must_use]
pub fn authors_label(names: &[String]) -> String {
    if names.is_empty() {
        "Unknown Author".to_string()
    } else {
        names.join(", ")
    }
}

/// Builds the medium cover image URL for a cover id, or the placeholder.
///
/// # Examples
///
/// ```
/// use bookfinder::domain::book::{cover_url, PLACEHOLDER_COVER_URL};
///
/// assert_eq!(
///     cover_url("https://covers.openlibrary.org", Some(8739161)),
///     "https://covers.openlibrary.org/b/id/8739161-M.jpg"
/// );
/// assert_eq!(cover_url("https://covers.openlibrary.org", None), PLACEHOLDER_COVER_URL);
/// ```
#[must_use]
pub fn cover_url(cover_host: &str, cover_id: Option<i64>) -> String {
    cover_id.map_or_else(
        || PLACEHOLDER_COVER_URL.to_string(),
        |id| format!("{}/b/id/{id}-M.jpg", cover_host.trim_end_matches('/')),
    )
}

/// Builds the public catalog page URL for an entity key.
#[must_use]
pub fn catalog_link(catalog_host: &str, key: &str) -> String {
    format!("{}{key}", catalog_host.trim_end_matches('/'))
}

/// First publication as reported by the work endpoint: either free-form date
/// text (`"1965"`, `"August 1965"`) or a bare year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FirstPublished {
    Year(i32),
    Date(String),
}

impl std::fmt::Display for FirstPublished {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Date(text) => f.write_str(text),
        }
    }
}

/// Normalized work detail. `description` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetail {
    pub title: String,
    pub description: String,
    pub first_published: Option<FirstPublished>,
    pub subjects: Vec<String>,
}

/// Minimal persisted projection of a [`BookSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub author_names: Vec<String>,
    #[serde(default)]
    pub cover_id: Option<i64>,
}

impl From<&BookSummary> for FavoriteRecord {
    fn from(book: &BookSummary) -> Self {
        Self {
            key: book.key.clone(),
            title: book.title.clone(),
            author_names: book.author_names.clone(),
            cover_id: book.cover_id,
        }
    }
}

impl FavoriteRecord {
    /// Author names joined for display, or `"Unknown Author"`.
    #[must_use]
    pub fn authors_label(&self) -> String {
        authors_label(&self.author_names)
    }
}

/// A work listed on an author page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorWork {
    pub key: String,
    pub title: String,
    pub first_published: Option<FirstPublished>,
    pub cover_id: Option<i64>,
}

/// Author profile with their listed works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorPage {
    pub id: String,
    pub name: String,
    pub bio: Option<String>,
    pub works: Vec<AuthorWork>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_year_defaults_to_zero() {
        let mut book = BookSummary::new("/works/OL1W", "Dune");
        assert_eq!(book.effective_year(), 0);
        book.first_publish_year = Some(1965);
        assert_eq!(book.effective_year(), 1965);
    }

    #[test]
    fn test_authors_label() {
        let mut book = BookSummary::new("/works/OL1W", "Good Omens");
        assert_eq!(book.authors_label(), "Unknown Author");
        book.author_names = vec!["Terry Pratchett".into(), "Neil Gaiman".into()];
        assert_eq!(book.authors_label(), "Terry Pratchett, Neil Gaiman");

        let record = FavoriteRecord::from(&book);
        assert_eq!(record.authors_label(), book.authors_label());
        assert_eq!(authors_label(&[]), "Unknown Author");
    }

    #[test]
    fn test_favorite_record_projection() {
        let mut book = BookSummary::new("/works/OL1W", "Dune");
        book.author_names = vec!["Frank Herbert".into()];
        book.cover_id = Some(42);
        book.languages = vec!["eng".into()];

        let record = FavoriteRecord::from(&book);
        assert_eq!(record.key, "/works/OL1W");
        assert_eq!(record.author_names, vec!["Frank Herbert".to_string()]);
        assert_eq!(record.cover_id, Some(42));
    }

    #[test]
    fn test_catalog_link_trims_trailing_slash() {
        assert_eq!(
            catalog_link("https://openlibrary.org/", "/works/OL1W"),
            "https://openlibrary.org/works/OL1W"
        );
    }

    #[test]
    fn test_first_published_untagged() {
        let year: FirstPublished = serde_json::from_str("1965").unwrap();
        assert_eq!(year, FirstPublished::Year(1965));
        let date: FirstPublished = serde_json::from_str("\"August 1965\"").unwrap();
        assert_eq!(date.to_string(), "August 1965");
    }
}
