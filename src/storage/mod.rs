//! Storage layer for favorites, recent searches and preferences.
//!
//! # Modules
//!
//! - `backend`: key-value [`Storage`] trait plus an in-memory backend
//! - `json`: JSON file-based storage implementation
//! - `models`: persisted keys and the [`Theme`] preference
//! - `library`: the [`Library`] store built on top of a backend

pub mod backend;
pub mod json;
pub mod library;
pub mod models;

pub use backend::{MemoryStorage, Storage};
pub use json::JsonStorage;
pub use library::Library;
pub use models::Theme;
