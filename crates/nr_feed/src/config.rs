use std::time::Duration;

use nr_core::pagination::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Page size before the user picks one.
    pub page_size: usize,
    /// Searches still pending after this long fail with `Error::Timeout`. `None` waits forever.
    pub search_timeout: Option<Duration>,
    /// Abort the in-flight search task when a newer one is issued.
    /// Stale results are discarded either way.
    pub cancel_superseded: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_timeout: Some(Duration::from_secs(10)),
            cancel_superseded: true,
        }
    }
}
