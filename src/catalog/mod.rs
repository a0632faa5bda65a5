//! Remote catalog access.
//!
//! - [`source`]: the [`CatalogSource`] trait and [`FetchOutcome`]
//! - [`http`]: `reqwest` implementation against Open Library
//! - [`wire`]: response formats and normalization
//! - [`detail`]: work key validation and detail lookup
//! - [`pages`]: category, author and work page loaders

pub mod detail;
pub mod http;
pub mod pages;
pub mod source;
pub mod wire;

pub use detail::{fetch_details, WorkKey};
pub use http::HttpCatalog;
pub use pages::{PageLoad, CATEGORIES};
pub use source::{CatalogFuture, CatalogSource, FetchOutcome};
