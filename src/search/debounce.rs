//! Debounced query emission.
//!
//! [`DebounceTimer`] is a single-shot scheduler that can be restarted or
//! cancelled; [`QueryController`] owns exactly one of them and turns a stream
//! of keystrokes into [`QueryEmission`]s.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Default quiet period before a typed query is emitted.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// A restartable one-shot timer running on the tokio runtime.
///
/// Starting the timer cancels any pending run. Dropping it cancels too, so a
/// callback can never fire after its owner is gone.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` to run once after `delay`, replacing any pending run.
    pub fn start<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        }));
    }

    /// Cancels the pending run, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Returns `true` while a run is scheduled and has not fired.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// A query leaving the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEmission {
    /// Explicit submit; always emitted.
    Immediate(String),
    /// Input went quiet and differs from the last emission.
    Settled(String),
}

impl QueryEmission {
    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            Self::Immediate(q) | Self::Settled(q) => q,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    value: String,
    last_emitted: String,
    // Bumped on every input, submit and reset; a timer only fires for the
    // generation it was started in.
    generation: u64,
}

fn same_query(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Owns the live query text and decides when it should be searched.
///
/// # Examples
///
/// ```
/// use bookfinder::search::{QueryController, QueryEmission};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
/// let mut controller = QueryController::new(Duration::from_millis(500), tx);
/// controller.input("dune");
/// controller.submit();
/// assert_eq!(rx.recv().await, Some(QueryEmission::Immediate("dune".into())));
/// # }
/// ```
#[derive(Debug)]
pub struct QueryController {
    shared: Arc<Mutex<Shared>>,
    timer: DebounceTimer,
    quiet_period: Duration,
    sender: UnboundedSender<QueryEmission>,
}

impl QueryController {
    /// Creates a controller with an empty query.
    ///
    /// # Parameters
    ///
    /// * `quiet_period` - How long input must stay unchanged before it settles
    /// * `sender` - Channel that receives every [`QueryEmission`]
    #[must_use]
    pub fn new(quiet_period: Duration, sender: UnboundedSender<QueryEmission>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            timer: DebounceTimer::new(),
            quiet_period,
            sender,
        }
    }

    fn shared(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    /// Replaces the controlled value and restarts the quiet period.
    pub fn input(&mut self, text: &str) {
        let generation = {
            let mut shared = self.shared();
            shared.value = text.to_string();
            shared.generation += 1;
            shared.generation
        };

        let shared = Arc::clone(&self.shared);
        let sender = self.sender.clone();
        self.timer.start(self.quiet_period, move || {
            let mut shared = lock(&shared);
            if shared.generation != generation || same_query(&shared.value, &shared.last_emitted) {
                return;
            }
            shared.last_emitted = shared.value.clone();
            tracing::debug!(query = %shared.value, "query settled");
            let _ = sender.send(QueryEmission::Settled(shared.value.clone()));
        });
    }

    /// Emits the current value immediately and drops any pending settle.
    pub fn submit(&mut self) {
        self.timer.cancel();
        let mut shared = self.shared();
        shared.generation += 1;
        shared.last_emitted = shared.value.clone();
        tracing::debug!(query = %shared.value, "query submitted");
        let _ = self.sender.send(QueryEmission::Immediate(shared.value.clone()));
    }

    /// Current controlled value.
    #[must_use]
    pub fn value(&self) -> String {
        self.shared().value.clone()
    }

    /// Clears the value and the memory of past emissions.
    pub fn reset(&mut self) {
        self.timer.cancel();
        let mut shared = self.shared();
        shared.generation += 1;
        shared.value.clear();
        shared.last_emitted.clear();
    }

    /// Cancels the pending settle; nothing fires afterwards.
    pub fn shutdown(&mut self) {
        self.timer.cancel();
        self.shared().generation += 1;
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
