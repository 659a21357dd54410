//! Debounced search coordination
//!
//! The repository does not coordinate concurrent invocations with each
//! other; that is this layer's job. The coordinator owns the single
//! outstanding deferred task as explicit state: every query change aborts
//! the pending task and schedules a replacement after a quiet period, so
//! rapid typing produces one search, not one per keystroke.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::CompanyListing;
use crate::repository::{ListingsReceiver, StockRepository};
use crate::resource::Resource;

/// Quiet period after the last query change before a search dispatches
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Per-session search coordinator
pub struct SearchCoordinator {
    repository: Arc<StockRepository>,
    sink: mpsc::Sender<Resource<Vec<CompanyListing>>>,
    query: Mutex<String>,
    search_job: Mutex<Option<JoinHandle<()>>>,
    debounce: Duration,
}

impl SearchCoordinator {
    /// Create a coordinator that forwards every emission to `sink`
    pub fn new(
        repository: Arc<StockRepository>,
        sink: mpsc::Sender<Resource<Vec<CompanyListing>>>,
    ) -> Self {
        Self {
            repository,
            sink,
            query: Mutex::new(String::new()),
            search_job: Mutex::new(None),
            debounce: DEBOUNCE,
        }
    }

    /// Record a query change and (re)schedule the debounced search. A
    /// pending not-yet-dispatched search for the previous query is
    /// cancelled.
    pub fn on_search_query_changed(&self, query: &str) {
        *self.query.lock() = query.to_string();

        let repository = Arc::clone(&self.repository);
        let sink = self.sink.clone();
        let debounce = self.debounce;
        let query = query.to_lowercase();

        let job = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tracing::debug!("Dispatching search for {:?}", query);
            pipe(repository.get_company_listings(false, query), sink).await;
        });

        let previous = self.search_job.lock().replace(job);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Manual refresh: dispatch immediately with a forced remote fetch for
    /// the current query
    pub fn refresh(&self) {
        let repository = Arc::clone(&self.repository);
        let sink = self.sink.clone();
        let query = self.query.lock().to_lowercase();

        tokio::spawn(async move {
            pipe(repository.get_company_listings(true, query), sink).await;
        });
    }
}

/// Forward one invocation's emissions in arrival order; stop when either
/// side goes away
async fn pipe(mut rx: ListingsReceiver, sink: mpsc::Sender<Resource<Vec<CompanyListing>>>) {
    while let Some(state) = rx.recv().await {
        if sink.send(state).await.is_err() {
            return;
        }
    }
}
