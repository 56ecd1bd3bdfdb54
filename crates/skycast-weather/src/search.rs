//! Debounced location search.
//!
//! [`Debouncer`] collapses bursts of calls into one delayed execution;
//! [`SearchController`] wires it to the geocoding client and a shared
//! suggestion list the UI can read.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::geocode::GeoClient;
use crate::types::LocationSuggestion;

/// Quiet window before a pending search fires.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

const SEARCH_FAILED_MESSAGE: &str = "Failed to search locations. Please try again later.";

/// Collapses bursts of calls into a single delayed execution.
///
/// At most one task is pending at any moment: each call aborts the
/// previous pending task and schedules its own, so a burst executes once,
/// with the last call's work, no earlier than one quiet window after the
/// last call. Work already past the window (in flight) is not cancelled.
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `task` to run after the quiet window, discarding any
    /// previously scheduled task.
    pub fn call<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let window = self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            task.await;
        });

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Discard the pending task, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Default)]
struct SearchState {
    suggestions: Vec<LocationSuggestion>,
    error: Option<String>,
}

/// Debounced autocomplete over the geocoding client.
///
/// Each scheduled search carries a sequence number; a response is applied
/// only while no newer search has been issued, so a slow early response
/// can never overwrite a fast later one.
pub struct SearchController {
    geo: Arc<GeoClient>,
    debouncer: Debouncer,
    state: Arc<Mutex<SearchState>>,
    seq: Arc<AtomicU64>,
}

impl SearchController {
    pub fn new(geo: Arc<GeoClient>) -> Self {
        Self::with_window(geo, SEARCH_DEBOUNCE)
    }

    /// Controller with a custom quiet window (used by tests).
    pub fn with_window(geo: Arc<GeoClient>, window: Duration) -> Self {
        Self {
            geo,
            debouncer: Debouncer::new(window),
            state: Arc::new(Mutex::new(SearchState::default())),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Feed the latest query text.
    ///
    /// Blank input clears the suggestions immediately and cancels any
    /// pending search without touching the network; anything else
    /// schedules a debounced search.
    pub fn set_query(&self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.debouncer.cancel();
            // Invalidate any search already in flight
            self.seq.fetch_add(1, Ordering::SeqCst);
            let mut state = self.state.lock();
            state.suggestions.clear();
            state.error = None;
            return;
        }

        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let geo = Arc::clone(&self.geo);
        let shared = Arc::clone(&self.state);
        let seq = Arc::clone(&self.seq);
        let query = trimmed.to_string();

        self.debouncer.call(async move {
            let result = geo.search(&query).await;

            if seq.load(Ordering::SeqCst) != ticket {
                tracing::debug!("Discarding stale search response for {:?}", query);
                return;
            }

            let mut state = shared.lock();
            match result {
                Ok(suggestions) => {
                    state.suggestions = suggestions;
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!("Location search failed: {}", e);
                    state.suggestions.clear();
                    state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                }
            }
        });
    }

    /// Current suggestion list (most recent completed search).
    pub fn suggestions(&self) -> Vec<LocationSuggestion> {
        self.state.lock().suggestions.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Drop suggestions and cancel any pending search.
    pub fn clear(&self) {
        self.set_query("");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tokio::time::Instant;

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<(String, Duration)>>>,
    }

    impl Recorder {
        fn record(&self, arg: &str, elapsed: Duration) {
            self.calls.lock().push((arg.to_string(), elapsed));
        }

        fn calls(&self) -> Vec<(String, Duration)> {
            self.calls.lock().clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_one_execution_with_last_args() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let recorder = Recorder::default();
        let start = Instant::now();

        let r = recorder.clone();
        debouncer.call(async move { r.record("first", start.elapsed()) });

        tokio::time::sleep(Duration::from_millis(100)).await;

        let r = recorder.clone();
        debouncer.call(async move { r.record("second", start.elapsed()) });

        tokio::time::sleep(Duration::from_millis(1000)).await;

        let calls = recorder.calls();
        assert_eq!(calls.len(), 1, "only the last call of the burst runs");
        assert_eq!(calls[0].0, "second");
        // Scheduled at t=100ms, quiet window 500ms: no earlier than t=600ms
        assert!(calls[0].1 >= Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn single_call_executes_after_window() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let recorder = Recorder::default();
        let start = Instant::now();

        let r = recorder.clone();
        debouncer.call(async move { r.record("only", start.elapsed()) });

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(recorder.calls().is_empty(), "must not fire inside the window");

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(recorder.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_task() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let recorder = Recorder::default();
        let start = Instant::now();

        let r = recorder.clone();
        debouncer.call(async move { r.record("cancelled", start.elapsed()) });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(recorder.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_each_execute() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let recorder = Recorder::default();
        let start = Instant::now();

        let r = recorder.clone();
        debouncer.call(async move { r.record("a", start.elapsed()) });
        tokio::time::sleep(Duration::from_millis(600)).await;

        let r = recorder.clone();
        debouncer.call(async move { r.record("b", start.elapsed()) });
        tokio::time::sleep(Duration::from_millis(600)).await;

        let args: Vec<_> = recorder.calls().into_iter().map(|(a, _)| a).collect();
        assert_eq!(args, vec!["a", "b"]);
    }
}
