//! User interface rendering layer.
//!
//! The UI layer follows a declarative rendering model:
//!
//! ```text
//! SessionState → compute_viewmodel → UIViewModel → render → ANSI text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Frame rendering
//! - [`theme`]: Dark and light palettes and ANSI escape sequences

pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Palette;
pub use viewmodel::{DetailInfo, DisplayItem, FooterInfo, HeaderInfo, SearchBarInfo, StatusLine, UIViewModel};
