use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::InvalidArgument(format!("Unknown category: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    pub image: String,
    pub published_at: DateTime<Utc>,
    pub source: Source,
    pub category: Category,
}

impl Article {
    /// `keyword` must already be lowercased.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.title.to_lowercase().contains(keyword)
            || self.description.to_lowercase().contains(keyword)
    }

    /// Content split on blank lines, trimmed, empty paragraphs dropped.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Long-form publication date, e.g. "October 19, 2026".
    pub fn published_label(&self) -> String {
        self.published_at.format("%B %-d, %Y").to_string()
    }

    /// Age relative to `now`, e.g. "3 days ago".
    pub fn published_ago(&self, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(self.published_at);
        if elapsed.num_seconds() < 0 {
            return "just now".to_string();
        }
        let (amount, unit) = if elapsed.num_days() > 0 {
            (elapsed.num_days(), "day")
        } else if elapsed.num_hours() > 0 {
            (elapsed.num_hours(), "hour")
        } else if elapsed.num_minutes() > 0 {
            (elapsed.num_minutes(), "minute")
        } else {
            return "just now".to_string();
        };
        if amount == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", amount, unit)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::article;
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("Technology".parse::<Category>().unwrap(), Category::Technology);
        assert_eq!(" sports ".parse::<Category>().unwrap(), Category::Sports);
        assert!(matches!("weather".parse::<Category>(), Err(Error::InvalidArgument(_))));
        assert_eq!(Category::Health.to_string(), "health");
    }

    #[test]
    fn test_category_serde_is_lowercase() {
        let json = serde_json::to_string(&Category::Entertainment).unwrap();
        assert_eq!(json, "\"entertainment\"");
        let back: Category = serde_json::from_str("\"science\"").unwrap();
        assert_eq!(back, Category::Science);
    }

    #[test]
    fn test_mentions_checks_title_and_description() {
        let a = article("1", "Quantum Leap", "Chips get faster", "cnn", Category::Technology);
        assert!(a.mentions("quantum"));
        assert!(a.mentions("faster"));
        assert!(!a.mentions("football"));
    }

    #[test]
    fn test_paragraphs_and_labels() {
        let a = article("1", "Title", "First.", "cnn", Category::General);
        assert_eq!(a.paragraphs(), vec!["First.", "Second paragraph."]);
        assert_eq!(a.published_label(), "October 19, 2026");

        let now = Utc.with_ymd_and_hms(2026, 10, 22, 12, 0, 0).unwrap();
        assert_eq!(a.published_ago(now), "3 days ago");
        assert_eq!(a.published_ago(a.published_at + Duration::hours(1)), "1 hour ago");
        assert_eq!(a.published_ago(a.published_at), "just now");
    }
}
