use nr_core::{Article, ArticleRepository, Notification};
use tracing::warn;

/// What the article page shows: the article, or a redirect back to the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleView {
    Found(Article),
    Redirect(Notification),
}

impl ArticleView {
    pub fn article(&self) -> Option<&Article> {
        match self {
            ArticleView::Found(article) => Some(article),
            ArticleView::Redirect(_) => None,
        }
    }
}

/// Looks up a single article for the detail page, independently of any filter state.
pub async fn load_article(repository: &dyn ArticleRepository, id: &str) -> ArticleView {
    match repository.get_by_id(id).await {
        Ok(Some(article)) => ArticleView::Found(article),
        Ok(None) => ArticleView::Redirect(Notification::error(
            "Article not found",
            "The article you requested could not be found.",
        )),
        Err(e) => {
            warn!("⚠️ Failed to load article {}: {}", id, e);
            ArticleView::Redirect(Notification::error(
                "Error",
                "Failed to load the article. Please try again later.",
            ))
        }
    }
}
