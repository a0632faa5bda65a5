//! Error types for bookfinder.
//!
//! This module defines the centralized error type [`CatalogError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.
//!
//! None of these errors are fatal to the process: the search orchestrator turns
//! them into in-state error text, detail lookups turn them into `None`, and the
//! library falls back to empty defaults.

use thiserror::Error;

/// The main error type for bookfinder operations.
///
/// Covers transport failures against the catalog, decoding problems, storage
/// failures and configuration issues. Cancellation is deliberately absent: an
/// aborted request is reported as [`crate::catalog::FetchOutcome::Aborted`],
/// never as an error.
///
/// # Examples
///
/// ```
/// use bookfinder::domain::CatalogError;
///
/// let err = CatalogError::Status { status: 503, url: "https://openlibrary.org/search.json".into() };
/// assert!(!err.is_network());
/// assert!(CatalogError::Unreachable("dns".into()).is_network());
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP client failed before a response was produced, or while
    /// reading the body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The catalog host could not be reached at all.
    #[error("Network error: {0}")]
    Unreachable(String),

    /// A response or persisted document could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Storage operation failed.
    ///
    /// Occurs when reading from or writing to the storage backend fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A catalog key does not reference the expected entity class.
    #[error("Invalid catalog key: {0}")]
    InvalidKey(String),
}

impl CatalogError {
    /// Returns `true` for network-class failures (connection refused, DNS,
    /// timeouts), as opposed to server-side or decoding failures.
    #[must_use]
    pub fn is_network(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Unreachable(_) => true,
            _ => false,
        }
    }
}

/// A specialized `Result` type for bookfinder operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
