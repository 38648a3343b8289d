pub mod error;
pub mod filters;
pub mod notification;
pub mod pagination;
pub mod storage;
pub mod types;

pub use error::Error;
pub use filters::{DateRange, FilterCriteria, FilterUpdate};
pub use notification::{Notification, Severity};
pub use pagination::{PageLink, PageRequest, PaginationState, ResultWindow, SearchResults};
pub use storage::ArticleRepository;
pub use types::{Article, Category, Source};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::{
        Article, ArticleRepository, Category, Error, FilterCriteria, FilterUpdate, Notification,
        PageRequest, PaginationState, Result, ResultWindow, SearchResults, Source,
    };
}
