//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. It
//! never touches the network, the timer or the library itself; the runtime
//! executes these actions in order.
//!
//! # Example
//!
//! ```rust
//! use bookfinder::app::Action;
//!
//! let actions = vec![
//!     Action::Search("dune".to_string()),
//!     Action::RecordRecent("dune".to_string()),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::domain::BookSummary;

/// Commands for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Feeds typed text to the debounced query controller.
    Input(String),

    /// Asks the controller for an immediate emission.
    SubmitQuery,

    /// Clears the controller and the published search state.
    ResetQuery,

    /// Starts an authoritative search, superseding any in flight.
    Search(String),

    /// Adds a query to the recent searches.
    RecordRecent(String),

    ToggleFavorite(BookSummary),

    RemoveFavorite(String),

    ClearRecents,

    ToggleTheme,

    /// Fetches the detail of a book key, replacing any pending detail fetch.
    FetchDetails(String),

    CancelDetails,

    LoadCategory(String),

    LoadAuthor(String),

    /// Loads a work page by bare id.
    LoadWork(String),

    /// Cancels outstanding page loads.
    CancelPages,

    /// Stops timers and in-flight requests before exit.
    Quit,
}
