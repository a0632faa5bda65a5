//! Search-and-filter orchestration.
//!
//! - [`debounce`]: turns keystrokes into settled or submitted queries
//! - [`orchestrator`]: runs searches with at most one authoritative request
//! - [`pipeline`]: pure filter/sort projection of the raw results

pub mod debounce;
pub mod orchestrator;
pub mod pipeline;

pub use debounce::{DebounceTimer, QueryController, QueryEmission, DEFAULT_QUIET_PERIOD};
pub use orchestrator::{PendingSearch, SearchOrchestrator, SearchSnapshot, MAX_RESULTS};
pub use pipeline::project;
