//! Filter criteria and the structural merge applied by `setFilters`-style updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Article, Category};

/// Inclusive publication-time bounds. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

/// Keyword, source and category constraints. An empty field means "no constraint".
/// Fields combine with AND; entries within a field combine with OR.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Fields present in `update` replace the current value wholesale; absent fields are kept.
    pub fn merge(&mut self, update: FilterUpdate) {
        let FilterUpdate {
            keywords,
            sources,
            categories,
            date_range,
        } = update;
        if let Some(keywords) = keywords {
            self.keywords = keywords;
        }
        if let Some(sources) = sources {
            self.sources = sources;
        }
        if let Some(categories) = categories {
            self.categories = categories;
        }
        if let Some(date_range) = date_range {
            self.date_range = date_range;
        }
    }

    pub fn merged(mut self, update: FilterUpdate) -> Self {
        self.merge(update);
        self
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.compile().matches(article)
    }

    /// Lowercases keywords once so a scan over the corpus does not repeat it per article.
    pub fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            keywords: self.keywords.iter().map(|k| k.to_lowercase()).collect(),
            criteria: self,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.keywords.is_empty()
            || !self.sources.is_empty()
            || !self.categories.is_empty()
            || self.date_range.is_some()
    }

    /// Count shown on the filter badge: one per source and category, plus one
    /// if any keyword is set.
    pub fn active_count(&self) -> usize {
        self.sources.len() + self.categories.len() + usize::from(!self.keywords.is_empty())
    }
}

pub struct CompiledFilter<'a> {
    keywords: Vec<String>,
    criteria: &'a FilterCriteria,
}

impl CompiledFilter<'_> {
    pub fn matches(&self, article: &Article) -> bool {
        if !self.keywords.is_empty() && !self.keywords.iter().any(|k| article.mentions(k)) {
            return false;
        }
        if !self.criteria.sources.is_empty()
            && !self.criteria.sources.contains(&article.source.id)
        {
            return false;
        }
        if !self.criteria.categories.is_empty()
            && !self.criteria.categories.contains(&article.category)
        {
            return false;
        }
        self.criteria
            .date_range
            .map_or(true, |range| range.contains(article.published_at))
    }
}

/// A partial `FilterCriteria`. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<Option<DateRange>>,
}

impl FilterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    pub fn categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    pub fn date_range(mut self, range: Option<DateRange>) -> Self {
        self.date_range = Some(range);
        self
    }

    /// A search box submission: a trimmed non-empty query becomes the only keyword,
    /// a blank one clears keywords.
    pub fn search_text(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            Self::new().keywords(Vec::<String>::new())
        } else {
            Self::new().keywords([query])
        }
    }

    pub fn toggle_source(current: &FilterCriteria, source_id: &str) -> Self {
        let mut sources = current.sources.clone();
        if let Some(pos) = sources.iter().position(|s| s == source_id) {
            sources.remove(pos);
        } else {
            sources.push(source_id.to_string());
        }
        Self::new().sources(sources)
    }

    pub fn toggle_category(current: &FilterCriteria, category: Category) -> Self {
        let mut categories = current.categories.clone();
        if let Some(pos) = categories.iter().position(|c| *c == category) {
            categories.remove(pos);
        } else {
            categories.push(category);
        }
        Self::new().categories(categories)
    }

    pub fn clear_all() -> Self {
        Self::new()
            .keywords(Vec::<String>::new())
            .sources(Vec::<String>::new())
            .categories(Vec::<Category>::new())
            .date_range(None)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_none()
            && self.sources.is_none()
            && self.categories.is_none()
            && self.date_range.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::article;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_merge_replaces_only_present_fields() {
        let mut criteria = FilterCriteria::new()
            .with_keywords(["ai"])
            .with_sources(["cnn"])
            .with_categories([Category::Health]);

        criteria.merge(FilterUpdate::new().sources(["wired", "bbc-news"]));

        assert_eq!(criteria.keywords, vec!["ai"]);
        assert_eq!(criteria.sources, vec!["wired", "bbc-news"]);
        assert_eq!(criteria.categories, vec![Category::Health]);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let criteria = FilterCriteria::new().with_keywords(["x"]);
        assert!(FilterUpdate::new().is_empty());
        assert_eq!(criteria.clone().merged(FilterUpdate::new()), criteria);
    }

    #[test]
    fn test_clear_all_resets_every_field() {
        let criteria = FilterCriteria::new()
            .with_keywords(["a"])
            .with_sources(["cnn"])
            .with_categories([Category::Sports])
            .with_date_range(DateRange::default())
            .merged(FilterUpdate::clear_all());
        assert_eq!(criteria, FilterCriteria::default());
        assert!(!criteria.is_active());
    }

    #[test]
    fn test_toggles_add_then_remove() {
        let criteria = FilterCriteria::new();
        let criteria = criteria.clone().merged(FilterUpdate::toggle_source(&criteria, "cnn"));
        assert_eq!(criteria.sources, vec!["cnn"]);
        let criteria = criteria.clone().merged(FilterUpdate::toggle_source(&criteria, "cnn"));
        assert!(criteria.sources.is_empty());

        let criteria = criteria
            .clone()
            .merged(FilterUpdate::toggle_category(&criteria, Category::Science));
        assert_eq!(criteria.categories, vec![Category::Science]);
        assert_eq!(criteria.active_count(), 1);
    }

    #[test]
    fn test_search_text_trims_and_clears() {
        assert_eq!(
            FilterUpdate::search_text("  quantum ").keywords,
            Some(vec!["quantum".to_string()])
        );
        assert_eq!(FilterUpdate::search_text("   ").keywords, Some(vec![]));
    }

    #[test]
    fn test_active_count_counts_keywords_once() {
        let criteria = FilterCriteria::new()
            .with_keywords(["a", "b"])
            .with_sources(["cnn", "wired"])
            .with_categories([Category::Health]);
        assert_eq!(criteria.active_count(), 4);
    }

    #[test]
    fn test_matching_is_and_across_fields_or_within() {
        let a = article("1", "New AI Breakthrough", "Healthcare model", "cnn", Category::Health);

        assert!(FilterCriteria::new().matches(&a));
        assert!(FilterCriteria::new().with_keywords(["ai", "football"]).matches(&a));
        assert!(FilterCriteria::new().with_keywords(["HEALTHCARE"]).matches(&a));
        assert!(!FilterCriteria::new().with_keywords(["football"]).matches(&a));
        assert!(FilterCriteria::new().with_sources(["wired", "cnn"]).matches(&a));
        assert!(!FilterCriteria::new()
            .with_keywords(["ai"])
            .with_sources(["wired"])
            .matches(&a));
        assert!(!FilterCriteria::new()
            .with_categories([Category::Sports])
            .matches(&a));
    }

    #[test]
    fn test_empty_keyword_matches_everything() {
        let a = article("1", "Title", "Description", "cnn", Category::General);
        assert!(FilterCriteria::new().with_keywords([""]).matches(&a));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let a = article("1", "Title", "Description", "cnn", Category::General);
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();

        let exact = DateRange { from: Some(at), to: Some(at) };
        assert!(FilterCriteria::new().with_date_range(exact).matches(&a));

        let later = DateRange { from: Some(at + Duration::seconds(1)), to: None };
        assert!(!FilterCriteria::new().with_date_range(later).matches(&a));

        let open = DateRange::default();
        assert!(FilterCriteria::new().with_date_range(open).matches(&a));
    }
}
