use async_trait::async_trait;

use crate::filters::FilterCriteria;
use crate::pagination::SearchResults;
use crate::types::{Article, Category, Source};
use crate::Result;

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Filter the corpus and return one page of matches plus the total match count.
    /// Fails with `Error::InvalidArgument` when `page` or `page_size` is zero.
    async fn search(
        &self,
        filters: &FilterCriteria,
        page: usize,
        page_size: usize,
    ) -> Result<SearchResults>;

    /// Exact id lookup. An unknown id is `Ok(None)`, not an error.
    async fn get_by_id(&self, id: &str) -> Result<Option<Article>>;

    async fn list_sources(&self) -> Result<Vec<Source>>;

    async fn list_categories(&self) -> Result<Vec<Category>>;
}
