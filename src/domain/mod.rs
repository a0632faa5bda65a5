//! Domain layer for bookfinder.
//!
//! Core types independent of HTTP, storage or rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`book`]: Catalog entities (summaries, details, favorites, authors)
//! - [`filters`]: Client-side filter state

pub mod book;
pub mod error;
pub mod filters;

pub use book::{AuthorPage, AuthorWork, BookDetail, BookSummary, FavoriteRecord, FirstPublished};
pub use error::{CatalogError, Result};
pub use filters::{FilterChip, FilterField, FilterState, FilterUpdate, SortOrder};
