// Debounced player search.
//
// Each keystroke reschedules the search: the pending task is aborted and a
// new one sleeps for the debounce window before calling the server. Every
// task is tagged with a generation so a result that was already in flight
// when a newer query arrived can be recognized and dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::PoolApi;
use crate::protocol::SearchStatus;

/// Shortest query, in characters after trimming, that is sent to the server.
pub const MIN_QUERY_LEN: usize = 2;

/// Outcome of one debounced search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEvent {
    pub generation: u64,
    pub status: SearchStatus,
}

pub struct SearchDebouncer {
    api: Arc<dyn PoolApi>,
    delay: Duration,
    tx: mpsc::Sender<SearchEvent>,
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl SearchDebouncer {
    pub fn new(api: Arc<dyn PoolApi>, delay: Duration, tx: mpsc::Sender<SearchEvent>) -> Self {
        Self {
            api,
            delay,
            tx,
            task: None,
            generation: 0,
        }
    }

    /// Replace any pending search with `query`.
    ///
    /// Returns `false` (and schedules nothing) when the trimmed query is
    /// shorter than `MIN_QUERY_LEN`.
    pub fn schedule(&mut self, query: &str) -> bool {
        self.cancel();

        let query = query.trim().to_string();
        if query.chars().count() < MIN_QUERY_LEN {
            return false;
        }

        let generation = self.generation;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let delay = self.delay;

        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(query = %query, generation, "running search");
            let status = match api.search(&query).await {
                Ok(hits) if hits.is_empty() => SearchStatus::NoResults,
                Ok(hits) => SearchStatus::Results(hits),
                Err(e) => {
                    warn!("search for {:?} failed: {}", query, e);
                    SearchStatus::Failed(e.to_string())
                }
            };
            let _ = tx.send(SearchEvent { generation, status }).await;
        }));
        true
    }

    /// Abort the pending search, if any, and invalidate results already in
    /// flight.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    /// Whether `generation` belongs to the most recent `schedule` call.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}
