//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the terminal driver and the catalog, search and
//! storage layers. It implements the event-driven loop that powers the
//! interactive session.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Input line → Event → handle_event → State Mutations → Actions → Side Effects
//!                           ↑                                        ↓
//!                           └──── emissions, search updates, loads ──┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`context`]: Services shared for the lifetime of a session
//! - [`handler`]: Event processing and state transitions
//! - [`input`]: Command line parsing
//! - [`runtime`]: Async event loop and action executor
//! - [`state`]: Session state and view model computation

pub mod actions;
pub mod context;
pub mod handler;
pub mod input;
pub mod runtime;
pub mod state;

pub use actions::Action;
pub use context::AppContext;
pub use handler::{handle_event, Event};
pub use state::SessionState;
