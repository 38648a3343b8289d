use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nr_core::{Article, ArticleRepository, Category, FilterCriteria, Result, SearchResults, Source};
use tracing::debug;

use crate::corpus::Corpus;

/// Simulated network latency per operation.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    pub search_latency: Duration,
    pub lookup_latency: Duration,
    pub sources_latency: Duration,
    pub categories_latency: Duration,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self {
            search_latency: Duration::from_millis(500),
            lookup_latency: Duration::from_millis(300),
            sources_latency: Duration::from_millis(300),
            categories_latency: Duration::from_millis(200),
        }
    }

    pub fn instant() -> Self {
        Self::uniform(Duration::ZERO)
    }

    pub fn uniform(latency: Duration) -> Self {
        Self {
            search_latency: latency,
            lookup_latency: latency,
            sources_latency: latency,
            categories_latency: latency,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only repository over a shared corpus. Clones share the same corpus.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    corpus: Arc<Corpus>,
    config: MemoryConfig,
}

impl InMemoryRepository {
    pub fn new(corpus: Arc<Corpus>, config: MemoryConfig) -> Self {
        Self { corpus, config }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[async_trait]
impl ArticleRepository for InMemoryRepository {
    async fn search(
        &self,
        filters: &FilterCriteria,
        page: usize,
        page_size: usize,
    ) -> Result<SearchResults> {
        simulate_latency(self.config.search_latency).await;
        let results = self.corpus.search(filters, page, page_size)?;
        debug!(
            "🔍 search page={} size={} -> {} of {}",
            page,
            page_size,
            results.articles.len(),
            results.total_results
        );
        Ok(results)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Article>> {
        simulate_latency(self.config.lookup_latency).await;
        Ok(self.corpus.get(id).cloned())
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        simulate_latency(self.config.sources_latency).await;
        Ok(self.corpus.sources().to_vec())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        simulate_latency(self.config.categories_latency).await;
        Ok(self.corpus.categories())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::test_support::tech_heavy_corpus;
    use nr_core::Error;
    use tokio::time::Instant;

    fn repository(config: MemoryConfig) -> InMemoryRepository {
        InMemoryRepository::new(Arc::new(tech_heavy_corpus()), config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_operations_take_configured_latency() {
        let repo = repository(MemoryConfig::new());

        let start = Instant::now();
        repo.search(&FilterCriteria::new(), 1, 10).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));

        let start = Instant::now();
        repo.list_categories().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200) && elapsed < Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_memory_repository() {
        let repo = repository(MemoryConfig::instant());

        let results = repo
            .search(&FilterCriteria::new().with_categories([Category::Technology]), 3, 5)
            .await
            .unwrap();
        assert_eq!(results.articles.len(), 2);
        assert_eq!(results.total_results, 12);

        assert_eq!(repo.get_by_id("a0").await.unwrap().map(|a| a.id), Some("a0".to_string()));
        assert_eq!(repo.get_by_id("nonexistent-id").await.unwrap(), None);
        assert_eq!(repo.list_sources().await.unwrap().len(), 2);
        assert_eq!(repo.list_categories().await.unwrap(), Category::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_invalid_page_propagates() {
        let repo = repository(MemoryConfig::instant());
        let err = repo.search(&FilterCriteria::new(), 0, 5).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_clones_share_corpus() {
        let repo = repository(MemoryConfig::instant());
        let other = repo.clone();
        assert!(Arc::ptr_eq(repo.corpus(), other.corpus()));
    }
}
