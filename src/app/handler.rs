//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user commands,
//! query emissions, search updates and page results, translating them into
//! state changes and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the command line, the query controller, the search
//!    orchestrator or a finished page load
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `SessionState` methods
//! 4. Actions are collected and returned for execution
//!
//! Results of loads that were superseded in the meantime (a different
//! category, author or work is now open, or the overlay was closed) are
//! dropped here.
//!
//! # Example
//!
//! ```rust
//! use bookfinder::app::state::{LibraryView, SessionState};
//! use bookfinder::app::{handle_event, Action, Event};
//! use bookfinder::search::QueryEmission;
//!
//! let mut state = SessionState::new(LibraryView::default());
//! let (_, actions) = handle_event(&mut state, Event::Emitted(QueryEmission::Immediate("dune".into())));
//! assert_eq!(actions, vec![Action::Search("dune".into()), Action::RecordRecent("dune".into())]);
//! ```

use crate::app::state::{DetailPanel, LibraryView, Screen, SessionState};
use crate::app::Action;
use crate::catalog::PageLoad;
use crate::domain::{AuthorPage, BookDetail, BookSummary, FilterField, FilterUpdate};
use crate::search::{QueryEmission, SearchSnapshot};
use std::sync::Arc;

/// Events from the user, the controller, the orchestrator and page loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Replaces the typed query text.
    Input(String),
    /// Requests an immediate search of the typed text.
    Submit,
    /// The query controller emitted a query.
    Emitted(QueryEmission),
    /// The orchestrator published new search state.
    SearchUpdated(SearchSnapshot),

    Filter(FilterUpdate),
    ClearFilter(FilterField),
    ResetFilters,

    /// Toggles favorite `n` (1-based) on the current screen.
    ToggleFavorite(usize),
    ShowFavorites,
    /// Searches recent query `n` (1-based).
    UseRecent(usize),
    ClearRecents,
    /// The persisted library changed.
    LibraryChanged(LibraryView),

    OpenDetails(usize),
    DetailLoaded {
        key: String,
        detail: Option<BookDetail>,
    },
    CloseDetails,

    OpenCategory(String),
    CategoryLoaded {
        name: String,
        page: PageLoad<Vec<BookSummary>>,
    },
    /// Opens the page of the first author of book `n`.
    OpenAuthor(usize),
    AuthorLoaded {
        id: String,
        page: PageLoad<AuthorPage>,
    },
    /// Opens the work page of entry `n`.
    OpenWork(usize),
    WorkLoaded {
        id: String,
        page: PageLoad<BookDetail>,
    },

    /// Feedback for the user, e.g. a rejected command.
    Notice(String),

    Home,
    ToggleTheme,
    Help,
    Quit,
}

impl Event {
    /// `true` for events typed by the user, which dismiss the previous notice.
    #[must_use]
    pub const fn is_command(&self) -> bool {
        !matches!(
            self,
            Self::Emitted(_)
                | Self::SearchUpdated(_)
                | Self::LibraryChanged(_)
                | Self::DetailLoaded { .. }
                | Self::CategoryLoaded { .. }
                | Self::AuthorLoaded { .. }
                | Self::WorkLoaded { .. }
                | Self::Notice(_)
        )
    }
}

/// Processes an event, mutates session state, and returns actions to execute.
///
/// The returned flag is `true` when the state changed in a way that needs a
/// new frame.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut SessionState, event: Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    if event.is_command() {
        state.notice = None;
        state.show_help = false;
    }

    match event {
        Event::Input(text) => {
            state.query.clone_from(&text);
            tracing::trace!(query = %state.query, "query text updated");
            (true, vec![Action::Input(text)])
        }
        Event::Submit => (false, vec![Action::SubmitQuery]),
        Event::Emitted(QueryEmission::Immediate(query)) => {
            state.screen = Screen::Search;
            let mut actions = vec![Action::Search(query.clone())];
            if !query.trim().is_empty() {
                actions.push(Action::RecordRecent(query));
            }
            (true, actions)
        }
        Event::Emitted(QueryEmission::Settled(query)) => (false, vec![Action::Search(query)]),
        Event::SearchUpdated(snapshot) => (state.apply_snapshot(snapshot), vec![]),

        Event::Filter(update) => {
            state.filters.apply(update);
            state.refresh();
            (true, vec![])
        }
        Event::ClearFilter(field) => {
            state.filters.clear(field);
            state.refresh();
            (true, vec![])
        }
        Event::ResetFilters => {
            state.filters.reset();
            state.refresh();
            (true, vec![])
        }

        Event::ToggleFavorite(n) => {
            if let Some(book) = state.book_at(n) {
                return (false, vec![Action::ToggleFavorite(BookSummary::clone(&book))]);
            }
            if let Some(favorite) = state.favorite_at(n) {
                return (false, vec![Action::RemoveFavorite(favorite.key.clone())]);
            }
            reject(state, n)
        }
        Event::ShowFavorites => {
            state.screen = Screen::Favorites;
            (true, vec![Action::CancelPages])
        }
        Event::UseRecent(n) => {
            let Some(query) = n.checked_sub(1).and_then(|i| state.library.recents.get(i)).cloned() else {
                state.notice = Some(format!("No recent search #{n}."));
                return (true, vec![]);
            };
            tracing::debug!(query = %query, "using recent search");
            state.query.clone_from(&query);
            (true, vec![Action::Input(query), Action::SubmitQuery])
        }
        Event::ClearRecents => (false, vec![Action::ClearRecents]),
        Event::LibraryChanged(view) => {
            if state.library == view {
                return (false, vec![]);
            }
            state.library = view;
            (true, vec![])
        }

        Event::OpenDetails(n) => {
            let Some((key, title)) = state.entry_at(n) else {
                return reject(state, n);
            };
            state.detail = Some(DetailPanel {
                key: key.clone(),
                title,
                loading: true,
                detail: None,
            });
            (true, vec![Action::FetchDetails(key)])
        }
        Event::DetailLoaded { key, detail } => match state.detail.as_mut() {
            Some(panel) if panel.key == key => {
                panel.loading = false;
                panel.detail = detail;
                (true, vec![])
            }
            _ => {
                tracing::debug!(key = %key, "dropping stale detail");
                (false, vec![])
            }
        },
        Event::CloseDetails => {
            let was_open = state.detail.take().is_some();
            (was_open, vec![Action::CancelDetails])
        }

        Event::OpenCategory(name) => {
            let name = name.trim().to_lowercase();
            if name.is_empty() {
                state.notice = Some(format!("Categories: {}", crate::catalog::CATEGORIES.join(", ")));
                return (true, vec![]);
            }
            state.detail = None;
            state.screen = Screen::Category {
                name: name.clone(),
                page: PageLoad::Loading,
            };
            (true, vec![Action::CancelDetails, Action::LoadCategory(name)])
        }
        Event::CategoryLoaded { name, page } => match &mut state.screen {
            Screen::Category { name: open, page: slot } if *open == name => {
                *slot = match page {
                    PageLoad::Ready(books) => PageLoad::Ready(books.into_iter().map(Arc::new).collect()),
                    PageLoad::Failed(message) => PageLoad::Failed(message),
                    PageLoad::Loading => PageLoad::Loading,
                };
                (true, vec![])
            }
            _ => (false, vec![]),
        },
        Event::OpenAuthor(n) => {
            let Some(book) = state.book_at(n) else {
                return reject(state, n);
            };
            let Some(author_id) = book.author_ids.first().cloned() else {
                state.notice = Some(format!("No author information for '{}'.", book.title));
                return (true, vec![]);
            };
            state.detail = None;
            state.screen = Screen::Author {
                id: author_id.clone(),
                page: PageLoad::Loading,
            };
            (true, vec![Action::CancelDetails, Action::LoadAuthor(author_id)])
        }
        Event::AuthorLoaded { id, page } => match &mut state.screen {
            Screen::Author { id: open, page: slot } if *open == id => {
                *slot = page;
                (true, vec![])
            }
            _ => (false, vec![]),
        },
        Event::OpenWork(n) => {
            let Some(work_id) = state.work_id_at(n) else {
                return reject(state, n);
            };
            state.detail = None;
            state.screen = Screen::Work {
                id: work_id.clone(),
                page: PageLoad::Loading,
            };
            (true, vec![Action::CancelDetails, Action::LoadWork(work_id)])
        }
        Event::WorkLoaded { id, page } => match &mut state.screen {
            Screen::Work { id: open, page: slot } if *open == id => {
                *slot = page;
                (true, vec![])
            }
            _ => (false, vec![]),
        },

        Event::Notice(message) => {
            state.notice = Some(message);
            (true, vec![])
        }
        Event::Home => {
            tracing::debug!("returning home");
            state.go_home();
            (true, vec![Action::CancelDetails, Action::CancelPages, Action::ResetQuery])
        }
        Event::ToggleTheme => (false, vec![Action::ToggleTheme]),
        Event::Help => {
            state.show_help = true;
            (true, vec![])
        }
        Event::Quit => {
            state.running = false;
            (false, vec![Action::Quit])
        }
    }
}

fn reject(state: &mut SessionState, n: usize) -> (bool, Vec<Action>) {
    state.notice = Some(format!("No entry #{n} on this screen."));
    (true, vec![])
}
