//! Session state management and view model computation.
//!
//! This module defines [`SessionState`], the single source of truth for the
//! transient state of one terminal session: the typed query, the filters, the
//! latest search snapshot, the current screen and the open detail overlay.
//!
//! # Architecture
//!
//! `SessionState` separates core data (the raw search snapshot, a mirror of
//! the persisted library) from derived state (the displayed list). The
//! displayed list is recomputed wholesale through
//! [`crate::search::pipeline::project`] whenever the snapshot or the filters
//! change. View models are computed on demand.
//!
//! # Example
//!
//! ```rust
//! use bookfinder::app::state::{LibraryView, SessionState};
//! use bookfinder::Config;
//!
//! let state = SessionState::new(LibraryView::default());
//! let vm = state.compute_viewmodel(&Config::default());
//! assert!(vm.search_bar.is_some());
//! ```

use crate::catalog::{PageLoad, WorkKey};
use crate::domain::book::{catalog_link, cover_url};
use crate::domain::{AuthorPage, BookDetail, BookSummary, FavoriteRecord, FilterState};
use crate::search::{project, SearchSnapshot};
use crate::storage::{Library, Theme};
use crate::ui::viewmodel::{
    DetailInfo, DisplayItem, FooterInfo, HeaderInfo, SearchBarInfo, StatusLine, UIViewModel,
};
use crate::Config;
use std::sync::Arc;

/// Subjects listed in the detail overlay.
pub const MAX_OVERLAY_SUBJECTS: usize = 12;

/// Subjects listed on a work page.
pub const MAX_PAGE_SUBJECTS: usize = 16;

const DETAILS_UNAVAILABLE: &str = "Details not available.";

/// Command reference shown by `:help`.
pub const HELP_LINES: &[&str] = &[
    "<text>            type a title (searched after a short pause)",
    "<empty line>, :go search now",
    ":cover on|off     only books with a cover",
    ":author NAME      author contains NAME",
    ":from YEAR        published in or after YEAR",
    ":to YEAR          published in or before YEAR",
    ":lang CODE        language code, e.g. eng",
    ":sort asc|desc|none",
    ":clear FIELD      cover, author, from, to, lang or sort",
    ":reset            clear all filters",
    ":fav N            toggle favorite N",
    ":favs             show favorites",
    ":recent N         search recent query N",
    ":recents clear    forget recent searches",
    ":details N        open details of book N",
    ":close            close details",
    ":cat NAME         browse a category",
    ":by N             open the author of book N",
    ":work N           open the work page of book N",
    ":home             back to an empty search",
    ":theme            toggle dark/light",
    ":quit",
];

/// Read-only mirror of the persisted library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryView {
    pub favorites: Vec<FavoriteRecord>,
    pub recents: Vec<String>,
    pub theme: Theme,
}

impl LibraryView {
    /// Copies the current contents of `library`.
    #[must_use]
    pub fn of(library: &Library) -> Self {
        Self {
            favorites: library.favorites().to_vec(),
            recents: library.list_recents().to_vec(),
            theme: library.theme(),
        }
    }

    #[must_use]
    pub fn is_favorite(&self, key: &str) -> bool {
        self.favorites.iter().any(|f| f.key == key)
    }
}

/// What the main area is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Search,
    Favorites,
    Category {
        name: String,
        page: PageLoad<Vec<Arc<BookSummary>>>,
    },
    Author {
        id: String,
        page: PageLoad<AuthorPage>,
    },
    Work {
        id: String,
        page: PageLoad<BookDetail>,
    },
}

/// Detail overlay for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub key: String,
    pub title: String,
    pub loading: bool,
    pub detail: Option<BookDetail>,
}

/// Transient state of one session.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Text as typed, untrimmed.
    pub query: String,

    pub filters: FilterState,

    /// Latest published search state.
    pub search: SearchSnapshot,

    /// `search.results` after filters and sorting.
    pub displayed: Vec<Arc<BookSummary>>,

    pub screen: Screen,

    pub detail: Option<DetailPanel>,

    pub library: LibraryView,

    pub notice: Option<String>,

    pub show_help: bool,

    pub running: bool,
}

impl SessionState {
    /// Creates a running session on the search screen with no query.
    #[must_use]
    pub fn new(library: LibraryView) -> Self {
        Self {
            query: String::new(),
            filters: FilterState::default(),
            search: SearchSnapshot::default(),
            displayed: Vec::new(),
            screen: Screen::Search,
            detail: None,
            library,
            notice: None,
            show_help: false,
            running: true,
        }
    }

    /// Adopts a new search snapshot. Returns `false` if nothing changed.
    pub fn apply_snapshot(&mut self, snapshot: SearchSnapshot) -> bool {
        if self.search == snapshot {
            return false;
        }
        self.search = snapshot;
        self.refresh();
        true
    }

    /// Recomputes the displayed list from the raw results and filters.
    pub fn refresh(&mut self) {
        let _span = tracing::debug_span!(
            "refresh_displayed",
            raw = self.search.results.len(),
            filtered = !self.filters.is_empty()
        )
        .entered();

        self.displayed = project(&self.search.results, &self.filters);
        tracing::debug!(displayed = self.displayed.len(), "displayed list recomputed");
    }

    /// Clears query, filters, results and any open page.
    pub fn go_home(&mut self) {
        self.query.clear();
        self.filters.reset();
        self.search = SearchSnapshot::default();
        self.displayed.clear();
        self.screen = Screen::Search;
        self.detail = None;
    }

    /// Book number `n` (1-based) on the current screen.
    #[must_use]
    pub fn book_at(&self, n: usize) -> Option<Arc<BookSummary>> {
        let index = n.checked_sub(1)?;
        match &self.screen {
            Screen::Search => self.displayed.get(index).cloned(),
            Screen::Category { page: PageLoad::Ready(books), .. } => books.get(index).cloned(),
            _ => None,
        }
    }

    /// Favorite number `n` (1-based), only while the favorites screen is shown.
    #[must_use]
    pub fn favorite_at(&self, n: usize) -> Option<&FavoriteRecord> {
        let index = n.checked_sub(1)?;
        match self.screen {
            Screen::Favorites => self.library.favorites.get(index),
            _ => None,
        }
    }

    /// Key and title of entry `n` on the current screen, whatever its kind.
    #[must_use]
    pub fn entry_at(&self, n: usize) -> Option<(String, String)> {
        if let Some(book) = self.book_at(n) {
            return Some((book.key.clone(), book.title.clone()));
        }
        if let Some(favorite) = self.favorite_at(n) {
            return Some((favorite.key.clone(), favorite.title.clone()));
        }
        match &self.screen {
            Screen::Author { page: PageLoad::Ready(author), .. } => {
                let work = author.works.get(n.checked_sub(1)?)?;
                Some((work.key.clone(), work.title.clone()))
            }
            _ => None,
        }
    }

    /// Bare work id of entry `n`, if it is a work.
    #[must_use]
    pub fn work_id_at(&self, n: usize) -> Option<String> {
        let (key, _) = self.entry_at(n)?;
        WorkKey::parse(&key).ok().map(|key| key.id().to_string())
    }

    /// "No results" text, shown only for a settled, error-free, non-blank
    /// query whose displayed list is empty.
    #[must_use]
    pub fn empty_message(&self) -> Option<String> {
        let query = self.search.query.trim();
        let settled = !self.search.loading && self.search.error.is_empty();
        (settled && !query.is_empty() && self.displayed.is_empty())
            .then(|| format!("No results for '{query}'. Try another title or adjust filters."))
    }

    /// Builds everything the renderer needs for the current screen.
    ///
    /// # Parameters
    ///
    /// * `config` - Supplies the cover and catalog hosts for item links
    ///
    /// # Returns
    ///
    /// A [`UIViewModel`] with the header, status, items and any open detail
    /// box filled in for the active [`Screen`].
    #[must_use]
    pub fn compute_viewmodel(&self, config: &Config) -> UIViewModel {
        let mut vm = UIViewModel {
            header: self.compute_header(),
            footer: self.compute_footer(),
            notice: self.notice.clone(),
            detail: self.detail.as_ref().map(|panel| detail_info(panel, config)),
            help: if self.show_help {
                HELP_LINES.iter().map(ToString::to_string).collect()
            } else {
                Vec::new()
            },
            ..UIViewModel::default()
        };

        match &self.screen {
            Screen::Search => {
                vm.search_bar = Some(SearchBarInfo {
                    query: self.query.clone(),
                    recents: self.library.recents.clone(),
                });
                vm.chips = self.filters.chips().into_iter().map(|chip| chip.label).collect();
                vm.status = self.search_status();
                vm.items = self.book_items(&self.displayed, config);
            }
            Screen::Favorites => {
                if self.library.favorites.is_empty() {
                    vm.text.push("No favorites yet. Use :fav N on a result to add one.".to_string());
                }
                vm.items = self
                    .library
                    .favorites
                    .iter()
                    .enumerate()
                    .map(|(i, favorite)| DisplayItem {
                        index: i + 1,
                        title: favorite.title.clone(),
                        subtitle: favorite.authors_label(),
                        year: None,
                        cover_url: cover_url(&config.cover_host, favorite.cover_id),
                        link: catalog_link(&config.catalog_host, &favorite.key),
                        is_favorite: true,
                    })
                    .collect();
            }
            Screen::Category { page, .. } => match page {
                PageLoad::Ready(books) => vm.items = self.book_items(books, config),
                other => vm.status = page_status(other),
            },
            Screen::Author { page, .. } => match page {
                PageLoad::Ready(author) => {
                    vm.text.push(
                        author
                            .bio
                            .clone()
                            .unwrap_or_else(|| "No biography available.".to_string()),
                    );
                    vm.items = author
                        .works
                        .iter()
                        .enumerate()
                        .map(|(i, work)| DisplayItem {
                            index: i + 1,
                            title: work.title.clone(),
                            subtitle: String::new(),
                            year: work.first_published.as_ref().map(ToString::to_string),
                            cover_url: cover_url(&config.cover_host, work.cover_id),
                            link: catalog_link(&config.catalog_host, &work.key),
                            is_favorite: false,
                        })
                        .collect();
                }
                other => vm.status = page_status(other),
            },
            Screen::Work { id, page } => match page {
                PageLoad::Ready(detail) => {
                    vm.text = detail_lines(detail, MAX_PAGE_SUBJECTS);
                    vm.text
                        .push(format!("Open Library: {}", catalog_link(&config.catalog_host, &format!("/works/{id}"))));
                }
                other => vm.status = page_status(other),
            },
        }

        vm
    }

    fn search_status(&self) -> Option<StatusLine> {
        if self.search.loading {
            Some(StatusLine::Loading("Searching...".to_string()))
        } else if !self.search.error.is_empty() {
            Some(StatusLine::Error(self.search.error.clone()))
        } else {
            self.empty_message().map(StatusLine::Empty)
        }
    }

    fn book_items(&self, books: &[Arc<BookSummary>], config: &Config) -> Vec<DisplayItem> {
        books
            .iter()
            .enumerate()
            .map(|(i, book)| DisplayItem {
                index: i + 1,
                title: book.title.clone(),
                subtitle: book.authors_label(),
                year: book.first_publish_year.map(|year| year.to_string()),
                cover_url: cover_url(&config.cover_host, book.cover_id),
                link: catalog_link(&config.catalog_host, &book.key),
                is_favorite: self.library.is_favorite(&book.key),
            })
            .collect()
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match &self.screen {
            Screen::Search => format!("Search ({})", self.displayed.len()),
            Screen::Favorites => format!("Favorites ({})", self.library.favorites.len()),
            Screen::Category { name, .. } => {
                format!("Category: {}", crate::catalog::pages::category_title(name))
            }
            Screen::Author { id, page } => match page {
                PageLoad::Ready(author) => format!("Author: {}", author.name),
                _ => format!("Author: {id}"),
            },
            Screen::Work { id, page } => match page {
                PageLoad::Ready(detail) => format!("Book: {}", detail.title),
                _ => format!("Book: {id}"),
            },
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = if self.detail.is_some() {
            ":close  :fav N  :help  :quit"
        } else {
            match self.screen {
                Screen::Search => "type to search  :go  :details N  :fav N  :favs  :cat NAME  :help  :quit",
                Screen::Favorites => ":fav N remove  :details N  :work N  :home  :help  :quit",
                Screen::Category { .. } => ":details N  :fav N  :by N  :work N  :home  :help  :quit",
                Screen::Author { .. } => ":work N  :details N  :home  :help  :quit",
                Screen::Work { .. } => ":home  :favs  :help  :quit",
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

fn page_status<T>(page: &PageLoad<T>) -> Option<StatusLine> {
    match page {
        PageLoad::Loading => Some(StatusLine::Loading("Loading...".to_string())),
        PageLoad::Failed(message) => Some(StatusLine::Error(message.clone())),
        PageLoad::Ready(_) => None,
    }
}

fn detail_lines(detail: &BookDetail, max_subjects: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(first) = &detail.first_published {
        lines.push(format!("First published: {first}"));
    }
    lines.push(detail.description.clone());
    if !detail.subjects.is_empty() {
        let subjects: Vec<&str> = detail.subjects.iter().take(max_subjects).map(String::as_str).collect();
        lines.push(format!("Subjects: {}", subjects.join(", ")));
    }
    lines
}

fn detail_info(panel: &DetailPanel, config: &Config) -> DetailInfo {
    let mut lines = if panel.loading {
        vec!["Loading details...".to_string()]
    } else {
        panel
            .detail
            .as_ref()
            .map_or_else(|| vec![DETAILS_UNAVAILABLE.to_string()], |d| detail_lines(d, MAX_OVERLAY_SUBJECTS))
    };
    lines.push(format!("Open Library: {}", catalog_link(&config.catalog_host, &panel.key)));

    DetailInfo {
        title: panel.title.clone(),
        lines,
    }
}
