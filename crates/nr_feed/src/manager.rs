//! Filter and pagination state for one view, and the searches it drives.
//!
//! Every mutation updates the visible state immediately, bumps the request id
//! and spawns a search. A finished search only lands if its id is still the
//! latest one, so a slow response can never overwrite newer state.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use nr_core::{
    Article, ArticleRepository, Category, Error, FilterCriteria, FilterUpdate, Notification,
    PageLink, PaginationState, Result, ResultWindow, SearchResults, Source,
};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub filters: FilterCriteria,
    pub pagination: PaginationState,
    pub window: ResultWindow,
    pub sources: Vec<Source>,
    pub categories: Vec<Category>,
    /// Id of the most recently issued search.
    pub request_id: u64,
}

impl FeedSnapshot {
    pub fn articles(&self) -> &[Article] {
        &self.window.articles
    }

    pub fn total_results(&self) -> usize {
        self.window.total_results
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.window.loading
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.window.total_results)
    }

    pub fn page_links(&self) -> Vec<PageLink> {
        self.pagination.page_links(self.window.total_results)
    }

    pub fn source_name(&self, source_id: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|s| s.id == source_id)
            .map(|s| s.name.as_str())
    }
}

#[derive(Debug, Clone, Default)]
struct SearchRequest {
    id: u64,
    filters: FilterCriteria,
    page: usize,
    page_size: usize,
}

impl SearchRequest {
    fn capture(snapshot: &FeedSnapshot) -> Self {
        Self {
            id: snapshot.request_id,
            filters: snapshot.filters.clone(),
            page: snapshot.pagination.current_page,
            page_size: snapshot.pagination.page_size,
        }
    }
}

pub struct FeedManager {
    repository: Arc<dyn ArticleRepository>,
    config: FeedConfig,
    state: Arc<watch::Sender<FeedSnapshot>>,
    notifications: mpsc::UnboundedSender<Notification>,
    /// Held while issuing so ids, state and the tracked task change together.
    in_flight: Mutex<Option<AbortHandle>>,
}

impl FeedManager {
    /// Starts loading sources, categories and the first page.
    ///
    /// Must be called from within a Tokio runtime. Failures are reported on the
    /// returned notification channel.
    pub fn new(
        repository: Arc<dyn ArticleRepository>,
        config: FeedConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (notifications, receiver) = mpsc::unbounded_channel();
        let initial = FeedSnapshot {
            filters: FilterCriteria::default(),
            pagination: PaginationState::new(1, config.page_size),
            window: ResultWindow::pending(),
            sources: Vec::new(),
            categories: Vec::new(),
            request_id: 0,
        };
        let (state, _) = watch::channel(initial);

        let manager = Self {
            repository,
            config,
            state: Arc::new(state),
            notifications,
            in_flight: Mutex::new(None),
        };
        manager.load_metadata();
        manager.issue(|_| {});
        (manager, receiver)
    }

    /// Merges `update` into the current filters and goes back to page 1.
    pub fn set_filters(&self, update: FilterUpdate) {
        info!("🔎 Updating filters: {:?}", update);
        self.issue(move |state| {
            state.filters.merge(update);
            state.pagination.current_page = 1;
        });
    }

    /// No clamping: an out-of-range page yields an empty window, page 0 a failed search.
    pub fn set_page(&self, page: usize) {
        debug!("📄 Moving to page {}", page);
        self.issue(move |state| state.pagination.current_page = page);
    }

    /// Keeps the current page.
    pub fn set_page_size(&self, page_size: usize) {
        debug!("📏 Page size set to {}", page_size);
        self.issue(move |state| state.pagination.page_size = page_size);
    }

    pub fn refresh(&self) {
        debug!("🔄 Refreshing articles");
        self.issue(|_| {});
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.state.borrow().clone()
    }

    pub fn filters(&self) -> FilterCriteria {
        self.state.borrow().filters.clone()
    }

    pub fn pagination(&self) -> PaginationState {
        self.state.borrow().pagination
    }

    pub fn window(&self) -> ResultWindow {
        self.state.borrow().window.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().window.loading
    }

    /// Receives every state change, including optimistic filter updates.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.state.subscribe()
    }

    /// Resolves with the first state matching `predicate`, checking the current state first.
    pub async fn wait_for(&self, predicate: impl FnMut(&FeedSnapshot) -> bool) -> FeedSnapshot {
        let mut receiver = self.state.subscribe();
        let matched = receiver.wait_for(predicate).await.map(|s| FeedSnapshot::clone(&s));
        matched.unwrap_or_else(|_| self.snapshot())
    }

    /// Resolves once the latest issued search has been applied.
    pub async fn wait_until_idle(&self) -> FeedSnapshot {
        self.wait_for(|s| !s.window.loading).await
    }

    fn issue(&self, mutate: impl FnOnce(&mut FeedSnapshot)) {
        let mut in_flight = lock(&self.in_flight);

        let mut request = SearchRequest::default();
        self.state.send_modify(|state| {
            mutate(state);
            state.request_id += 1;
            state.window.loading = true;
            request = SearchRequest::capture(state);
        });
        debug!(
            "📨 Issuing search #{} page={} size={}",
            request.id, request.page, request.page_size
        );

        let task = tokio::spawn(run_search(
            self.repository.clone(),
            self.state.clone(),
            self.notifications.clone(),
            request,
            self.config.search_timeout,
        ));

        if let Some(previous) = in_flight.replace(task.abort_handle()) {
            if self.config.cancel_superseded {
                previous.abort();
            }
        }
    }

    fn load_metadata(&self) {
        let repository = self.repository.clone();
        let state = self.state.clone();
        let notifications = self.notifications.clone();

        tokio::spawn(async move {
            let (sources, categories) =
                tokio::join!(repository.list_sources(), repository.list_categories());

            match sources {
                Ok(sources) => {
                    info!("📰 Loaded {} sources", sources.len());
                    state.send_modify(|s| s.sources = sources);
                }
                Err(e) => {
                    warn!("⚠️ Failed to load sources: {}", e);
                    let _ = notifications.send(Notification::error(
                        "Error",
                        "Failed to load news sources. Please try again later.",
                    ));
                }
            }

            match categories {
                Ok(categories) => state.send_modify(|s| s.categories = categories),
                Err(e) => {
                    warn!("⚠️ Failed to load categories: {}", e);
                    let _ = notifications.send(Notification::error(
                        "Error",
                        "Failed to load news categories. Please try again later.",
                    ));
                }
            }
        });
    }
}

impl Drop for FeedManager {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.in_flight).take() {
            task.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn fetch(
    repository: &dyn ArticleRepository,
    request: &SearchRequest,
    timeout: Option<Duration>,
) -> Result<SearchResults> {
    let search = repository.search(&request.filters, request.page, request.page_size);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, search)
            .await
            .map_err(|_| Error::Timeout(limit))?,
        None => search.await,
    }
}

async fn run_search(
    repository: Arc<dyn ArticleRepository>,
    state: Arc<watch::Sender<FeedSnapshot>>,
    notifications: mpsc::UnboundedSender<Notification>,
    request: SearchRequest,
    timeout: Option<Duration>,
) {
    let outcome = fetch(repository.as_ref(), &request, timeout).await;

    let mut failure = None;
    let applied = state.send_if_modified(|snapshot| {
        if snapshot.request_id != request.id {
            return false;
        }
        snapshot.window.loading = false;
        match outcome {
            Ok(results) => {
                snapshot.window.articles = results.articles;
                snapshot.window.total_results = results.total_results;
            }
            Err(e) => {
                snapshot.window.articles.clear();
                snapshot.window.total_results = 0;
                failure = Some(e);
            }
        }
        true
    });

    if !applied {
        debug!("⏭️ Discarding stale response for search #{}", request.id);
        return;
    }

    match failure {
        Some(e) => {
            warn!("⚠️ Search #{} failed: {}", request.id, e);
            let _ = notifications.send(Notification::error(
                "Error",
                "Failed to load news articles. Please try again later.",
            ));
        }
        None => debug!("✅ Search #{} applied", request.id),
    }
}
