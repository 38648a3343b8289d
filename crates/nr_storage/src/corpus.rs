//! The immutable article store shared by every query.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use nr_core::{Article, Category, Error, FilterCriteria, PageRequest, Result, SearchResults, Source};
use serde::{Deserialize, Serialize};
use url::Url;

/// Articles in insertion order plus the sources they reference.
/// Validated once at construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    sources: Vec<Source>,
    articles: Vec<Article>,
}

#[derive(Serialize, Deserialize)]
struct CorpusFile {
    sources: Vec<Source>,
    articles: Vec<Article>,
}

impl Corpus {
    pub fn new(sources: Vec<Source>, articles: Vec<Article>) -> Result<Self> {
        let mut source_ids = HashSet::new();
        for source in &sources {
            if source.id.is_empty() {
                return Err(Error::Storage("source with empty id".to_string()));
            }
            if !source_ids.insert(source.id.as_str()) {
                return Err(Error::Storage(format!("duplicate source id: {}", source.id)));
            }
            check_url(&source.url, &source.id)?;
            if let Some(icon) = &source.icon {
                check_url(icon, &source.id)?;
            }
        }

        let mut article_ids = HashSet::new();
        for article in &articles {
            if article.id.is_empty() {
                return Err(Error::Storage(format!("article with empty id: {}", article.title)));
            }
            if !article_ids.insert(article.id.as_str()) {
                return Err(Error::Storage(format!("duplicate article id: {}", article.id)));
            }
            if !source_ids.contains(article.source.id.as_str()) {
                return Err(Error::Storage(format!(
                    "article {} references unknown source {}",
                    article.id, article.source.id
                )));
            }
            check_url(&article.url, &article.id)?;
            check_url(&article.image, &article.id)?;
        }

        Ok(Self { sources, articles })
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn categories(&self) -> Vec<Category> {
        Category::ALL.to_vec()
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn search(
        &self,
        filters: &FilterCriteria,
        page: usize,
        page_size: usize,
    ) -> Result<SearchResults> {
        let request = PageRequest::new(page, page_size)?;
        let filter = filters.compile();
        let matches: Vec<&Article> = self.articles.iter().filter(|a| filter.matches(a)).collect();
        let articles = request.slice(&matches).iter().map(|a| (*a).clone()).collect();
        Ok(SearchResults {
            articles,
            total_results: matches.len(),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: CorpusFile = serde_json::from_str(raw)?;
        Self::new(file.sources, file.articles)
    }

    pub fn to_json(&self) -> Result<String> {
        let file = CorpusFile {
            sources: self.sources.clone(),
            articles: self.articles.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn write_json_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn check_url(raw: &str, owner: &str) -> Result<()> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|e| Error::Storage(format!("invalid URL {:?} on {}: {}", raw, owner, e)))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_category_scenario_pages() {
        let corpus = tech_heavy_corpus();
        let tech = FilterCriteria::new().with_categories([Category::Technology]);

        let first = corpus.search(&tech, 1, 5).unwrap();
        assert_eq!(first.articles.len(), 5);
        assert_eq!(first.total_results, 12);

        let third = corpus.search(&tech, 3, 5).unwrap();
        assert_eq!(third.articles.len(), 2);
        assert_eq!(third.total_results, 12);
        assert!(third.articles.iter().all(|a| a.category == Category::Technology));
    }

    #[test]
    fn test_no_filters_returns_whole_corpus() {
        let corpus = tech_heavy_corpus();
        let results = corpus.search(&FilterCriteria::new(), 1, 100).unwrap();
        assert_eq!(results.total_results, 20);
        assert_eq!(results.articles, corpus.articles());
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_error() {
        let corpus = tech_heavy_corpus();
        let results = corpus.search(&FilterCriteria::new(), 50, 10).unwrap();
        assert!(results.articles.is_empty());
        assert_eq!(results.total_results, 20);
    }

    #[test]
    fn test_invalid_page_arguments() {
        let corpus = tech_heavy_corpus();
        assert!(matches!(
            corpus.search(&FilterCriteria::new(), 0, 10),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            corpus.search(&FilterCriteria::new(), 1, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pages_partition_filtered_sequence() {
        let corpus = tech_heavy_corpus();
        let filters = FilterCriteria::new().with_sources(["wired"]);
        let full = corpus.search(&filters, 1, usize::MAX).unwrap();

        let page_size = 5;
        let total_pages = full.total_results.div_ceil(page_size);
        let mut stitched = Vec::new();
        for page in 1..=total_pages {
            stitched.extend(corpus.search(&filters, page, page_size).unwrap().articles);
        }
        assert_eq!(stitched, full.articles);
    }

    #[test]
    fn test_search_is_idempotent() {
        let corpus = tech_heavy_corpus();
        let filters = FilterCriteria::new().with_keywords(["story 1"]);
        assert_eq!(
            corpus.search(&filters, 1, 3).unwrap(),
            corpus.search(&filters, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_get_by_id() {
        let corpus = tech_heavy_corpus();
        assert_eq!(corpus.get("a3").map(|a| a.title.as_str()), Some("Story 3"));
        assert!(corpus.get("nonexistent-id").is_none());
    }

    #[test]
    fn test_rejects_duplicate_ids_and_unknown_sources() {
        let dup = Corpus::new(
            vec![source("cnn")],
            vec![
                article("x", "One", "cnn", Category::General),
                article("x", "Two", "cnn", Category::General),
            ],
        );
        assert!(matches!(dup, Err(Error::Storage(_))));

        let orphan = Corpus::new(
            vec![source("cnn")],
            vec![article("y", "One", "wired", Category::General)],
        );
        assert!(matches!(orphan, Err(Error::Storage(_))));

        let dup_source = Corpus::new(vec![source("cnn"), source("cnn")], vec![]);
        assert!(matches!(dup_source, Err(Error::Storage(_))));
    }

    #[test]
    fn test_rejects_bad_urls() {
        let mut bad = article("z", "One", "cnn", Category::General);
        bad.url = "not a url".to_string();
        assert!(matches!(Corpus::new(vec![source("cnn")], vec![bad]), Err(Error::Storage(_))));
    }

    #[test]
    fn test_json_file_round_trip() {
        let corpus = tech_heavy_corpus();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        corpus.write_json_file(&path).unwrap();
        assert_eq!(Corpus::from_json_file(&path).unwrap(), corpus);
    }

    #[test]
    fn test_from_json_reports_malformed_input() {
        assert!(matches!(Corpus::from_json("{"), Err(Error::Serialization(_))));
        assert!(matches!(
            Corpus::from_json_file(Path::new("/nonexistent/corpus.json")),
            Err(Error::Io(_))
        ));
    }
}
