pub mod config;
pub mod detail;
pub mod manager;

pub use config::FeedConfig;
pub use detail::{load_article, ArticleView};
pub use manager::{FeedManager, FeedSnapshot};

pub mod prelude {
    pub use super::{load_article, ArticleView, FeedConfig, FeedManager, FeedSnapshot};
    pub use nr_core::{FilterCriteria, FilterUpdate, Notification, Result, Error};
}
