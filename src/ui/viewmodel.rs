//! View model types representing renderable UI state.
//!
//! View models are computed from `SessionState::compute_viewmodel()` and
//! consumed by the renderer. They hold display-ready text only: URLs are
//! already built, years already formatted, messages already chosen.
//!
//! # Example
//!
//! ```rust
//! use bookfinder::ui::viewmodel::{DisplayItem, FooterInfo, HeaderInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo { title: "Search (1)".to_string() },
//!     items: vec![DisplayItem {
//!         index: 1,
//!         title: "Dune".to_string(),
//!         subtitle: "Frank Herbert".to_string(),
//!         year: Some("1965".to_string()),
//!         cover_url: "https://covers.openlibrary.org/b/id/1-M.jpg".to_string(),
//!         link: "https://openlibrary.org/works/OL893415W".to_string(),
//!         is_favorite: false,
//!     }],
//!     footer: FooterInfo { keybindings: ":help".to_string() },
//!     ..UIViewModel::default()
//! };
//! assert_eq!(vm.items.len(), 1);
//! ```

/// Complete UI view model for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Present on the search screen only.
    pub search_bar: Option<SearchBarInfo>,

    /// Labels of the active filter chips.
    pub chips: Vec<String>,

    pub status: Option<StatusLine>,

    /// One-shot feedback from the last command.
    pub notice: Option<String>,

    /// Free text shown above the list (author bio, work description).
    pub text: Vec<String>,

    pub items: Vec<DisplayItem>,

    /// Detail overlay for a single book.
    pub detail: Option<DetailInfo>,

    /// Command reference, shown after `:help`.
    pub help: Vec<String>,

    pub footer: FooterInfo,
}

/// Header display information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

/// Search input and recent queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub recents: Vec<String>,
}

/// Loading, error or empty-result line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Loading(String),
    Error(String),
    Empty(String),
}

/// One numbered row: a book, a favorite or an author's work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// 1-based number used by commands such as `:fav N`.
    pub index: usize,
    pub title: String,
    /// Authors, or empty when the context already names them.
    pub subtitle: String,
    pub year: Option<String>,
    pub cover_url: String,
    pub link: String,
    pub is_favorite: bool,
}

/// Content of the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailInfo {
    pub title: String,
    pub lines: Vec<String>,
}

/// Footer display information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}
