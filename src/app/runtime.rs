//! Async event loop for the terminal driver.
//!
//! The loop multiplexes four sources with `tokio::select!`:
//! - command lines from stdin
//! - emissions of the debounced [`QueryController`]
//! - search state published by the orchestrator's watch channel
//! - results of detail and page loads spawned by the [`Executor`]
//!
//! Every source is turned into an [`Event`], run through [`handle_event`],
//! and the resulting actions are executed in order.

use crate::app::input::parse_command;
use crate::app::state::{LibraryView, SessionState};
use crate::app::{handle_event, Action, AppContext, Event};
use crate::catalog::{fetch_details, pages, CatalogSource};
use crate::domain::error::Result;
use crate::search::{QueryController, QueryEmission, SearchOrchestrator};
use crate::storage::Library;
use crate::ui::{render, Palette};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Runs an interactive session on stdin/stdout until `:quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn run(ctx: AppContext) -> Result<()> {
    let (emissions_tx, mut emissions) = mpsc::unbounded_channel::<QueryEmission>();
    let (loads_tx, mut loads) = mpsc::unbounded_channel::<Event>();
    let mut search_updates = ctx.orchestrator.subscribe();

    let mut executor = Executor::new(&ctx, emissions_tx, loads_tx);
    let mut state = SessionState::new(LibraryView::of(&ctx.library()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!(catalog_host = %ctx.config.catalog_host, "session started");
    draw(&state, &ctx);

    while state.running {
        let event = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => parse_command(&line).unwrap_or_else(Event::Notice),
                None => Event::Quit,
            },
            Some(emission) = emissions.recv() => Event::Emitted(emission),
            changed = search_updates.changed() => {
                if changed.is_err() {
                    break;
                }
                Event::SearchUpdated(search_updates.borrow_and_update().clone())
            }
            Some(event) = loads.recv() => event,
        };

        if dispatch(&mut state, &mut executor, event) {
            draw(&state, &ctx);
        }
    }

    executor.shutdown();
    tracing::info!("session ended");
    Ok(())
}

/// Handles an event and every follow-up event its actions produce.
///
/// Returns `true` if a new frame is needed.
pub fn dispatch(state: &mut SessionState, executor: &mut Executor, event: Event) -> bool {
    let mut queue = VecDeque::from([event]);
    let mut needs_render = false;

    while let Some(event) = queue.pop_front() {
        let (render, actions) = handle_event(state, event);
        needs_render |= render;
        for action in actions {
            if let Some(follow_up) = executor.execute(action) {
                queue.push_back(follow_up);
            }
        }
    }

    needs_render
}

fn draw(state: &SessionState, ctx: &AppContext) {
    let vm = state.compute_viewmodel(&ctx.config);
    let frame = render(&vm, &Palette::for_theme(state.library.theme));

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(frame.as_bytes()).and_then(|()| stdout.flush()) {
        tracing::warn!(error = %e, "failed to write frame");
    }
}

/// Executes [`Action`]s against the controller, the orchestrator, the catalog
/// and the library.
///
/// Library writes run inline and report back through a follow-up event.
/// Network work is spawned; its results arrive on the loads channel.
pub struct Executor {
    controller: QueryController,
    orchestrator: Arc<SearchOrchestrator>,
    catalog: Arc<dyn CatalogSource>,
    library: Arc<Mutex<Library>>,
    loads: UnboundedSender<Event>,
    detail_cancel: Option<CancellationToken>,
    page_cancel: Option<CancellationToken>,
}

impl Executor {
    /// Creates an executor sharing the context's orchestrator, catalog and
    /// library.
    ///
    /// # Parameters
    ///
    /// * `ctx` - Application context
    /// * `emissions` - Receives settled and immediate queries from the controller
    /// * `loads` - Receives results of spawned detail and page loads
    #[must_use]
    pub fn new(ctx: &AppContext, emissions: UnboundedSender<QueryEmission>, loads: UnboundedSender<Event>) -> Self {
        Self {
            controller: QueryController::new(ctx.config.quiet_period(), emissions),
            orchestrator: Arc::clone(&ctx.orchestrator),
            catalog: Arc::clone(&ctx.catalog),
            library: ctx.shared_library(),
            loads,
            detail_cancel: None,
            page_cancel: None,
        }
    }

    /// Executes one action. Returns the event to feed back, if any.
    pub fn execute(&mut self, action: Action) -> Option<Event> {
        tracing::trace!(action = ?action, "executing action");

        match action {
            Action::Input(text) => self.controller.input(&text),
            Action::SubmitQuery => self.controller.submit(),
            Action::ResetQuery => {
                self.controller.reset();
                self.spawn_search(String::new());
            }
            Action::Search(query) => self.spawn_search(query),
            Action::RecordRecent(query) => return self.update_library(|lib| lib.add_recent(&query)),
            Action::ToggleFavorite(book) => return self.update_library(|lib| lib.toggle_favorite(&book).map(drop)),
            Action::RemoveFavorite(key) => return self.update_library(|lib| lib.remove_favorite(&key).map(drop)),
            Action::ClearRecents => return self.update_library(Library::clear_recents),
            Action::ToggleTheme => return self.update_library(|lib| lib.toggle_theme().map(drop)),
            Action::FetchDetails(key) => {
                let cancel = replace_token(&mut self.detail_cancel);
                let catalog = Arc::clone(&self.catalog);
                let loads = self.loads.clone();
                tokio::spawn(
                    async move {
                        let detail = fetch_details(catalog.as_ref(), &key, cancel.clone()).await;
                        if !cancel.is_cancelled() {
                            let _ = loads.send(Event::DetailLoaded { key, detail });
                        }
                    }
                    .instrument(tracing::debug_span!("fetch_details")),
                );
            }
            Action::CancelDetails => cancel_token(&mut self.detail_cancel),
            Action::LoadCategory(name) => {
                let cancel = replace_token(&mut self.page_cancel);
                let catalog = Arc::clone(&self.catalog);
                let loads = self.loads.clone();
                tokio::spawn(
                    async move {
                        if let Some(page) = pages::load_subject(catalog.as_ref(), &name, cancel).await {
                            let _ = loads.send(Event::CategoryLoaded { name, page });
                        }
                    }
                    .instrument(tracing::debug_span!("load_category")),
                );
            }
            Action::LoadAuthor(id) => {
                let cancel = replace_token(&mut self.page_cancel);
                let catalog = Arc::clone(&self.catalog);
                let loads = self.loads.clone();
                tokio::spawn(
                    async move {
                        if let Some(page) = pages::load_author(catalog.as_ref(), &id, cancel).await {
                            let _ = loads.send(Event::AuthorLoaded { id, page });
                        }
                    }
                    .instrument(tracing::debug_span!("load_author")),
                );
            }
            Action::LoadWork(id) => {
                let cancel = replace_token(&mut self.page_cancel);
                let catalog = Arc::clone(&self.catalog);
                let loads = self.loads.clone();
                tokio::spawn(
                    async move {
                        if let Some(page) = pages::load_work(catalog.as_ref(), &id, cancel).await {
                            let _ = loads.send(Event::WorkLoaded { id, page });
                        }
                    }
                    .instrument(tracing::debug_span!("load_work")),
                );
            }
            Action::CancelPages => cancel_token(&mut self.page_cancel),
            Action::Quit => self.shutdown(),
        }
        None
    }

    /// Stops the debounce timer and every in-flight request.
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
        self.orchestrator.cancel();
        cancel_token(&mut self.detail_cancel);
        cancel_token(&mut self.page_cancel);
    }

    /// Issues the search inline so the order of actions decides which query
    /// is authoritative; only the response is awaited on a spawned task.
    fn spawn_search(&self, query: String) {
        let Some(pending) = self.orchestrator.begin(&query) else {
            return;
        };
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::spawn(async move { orchestrator.complete(pending).await });
    }

    fn update_library(&self, op: impl FnOnce(&mut Library) -> Result<()>) -> Option<Event> {
        let mut library = self.library.lock().unwrap_or_else(PoisonError::into_inner);
        match op(&mut *library) {
            Ok(()) => Some(Event::LibraryChanged(LibraryView::of(&library))),
            Err(e) => {
                tracing::warn!(error = %e, "library update failed");
                Some(Event::Notice(format!("Could not save: {e}")))
            }
        }
    }
}

fn replace_token(slot: &mut Option<CancellationToken>) -> CancellationToken {
    cancel_token(slot);
    let token = CancellationToken::new();
    *slot = Some(token.clone());
    token
}

fn cancel_token(slot: &mut Option<CancellationToken>) {
    if let Some(token) = slot.take() {
        token.cancel();
    }
}
