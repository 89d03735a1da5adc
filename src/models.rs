//! Data models for raw provider records and normalized articles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawArticle`]: A provider record before normalization, every field optional
//! - [`Article`]: The normalized record consumed by filtering and the snapshot
//! - [`Category`] and [`Sentiment`]: The two closed label sets
//! - [`Selection`]: A filter parameter that is either "all" or one value
//!
//! Articles serialize with camelCase keys (`urlToImage`, `publishedAt`) so the
//! snapshot file matches what dashboard consumers already read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Topic tag attached to every article.
///
/// The set is closed. Unknown input maps to [`Category::General`] through
/// [`Category::parse_lenient`]; [`FromStr`] is the strict form used for CLI
/// arguments and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    World,
    Health,
    Finance,
    Sports,
    Politics,
    General,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Technology,
        Category::World,
        Category::Health,
        Category::Finance,
        Category::Sports,
        Category::Politics,
        Category::General,
    ];

    /// The categories the poller fetches by default.
    pub const FETCHED: [Category; 6] = [
        Category::Technology,
        Category::World,
        Category::Health,
        Category::Finance,
        Category::Sports,
        Category::Politics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::World => "world",
            Category::Health => "health",
            Category::Finance => "finance",
            Category::Sports => "sports",
            Category::Politics => "politics",
            Category::General => "general",
        }
    }

    /// Parse a category name, mapping anything unrecognized (or empty) to
    /// [`Category::General`].
    pub fn parse_lenient(s: &str) -> Category {
        s.parse().unwrap_or(Category::General)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown category `{s}`"))
    }
}

/// Coarse three-way polarity derived from article text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Sentiment::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| format!("unknown sentiment `{s}`"))
    }
}

/// A filter parameter: either match everything, or match one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr<Err = String>,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

/// The publisher of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: String,
}

/// A normalized news record.
///
/// Produced fresh by every ingestion call and never updated in place; a new
/// fetch replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    #[serde(rename = "urlToImage", alias = "imageUrl")]
    pub image_url: String,
    pub published_at: DateTime<Utc>,
    pub source: ArticleSource,
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient_category")]
    pub category: Category,
    pub sentiment: Sentiment,
}

/// Snapshots written by other tools may carry categories outside the closed
/// set; those load as [`Category::General`].
fn lenient_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Category, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(Category::parse_lenient(&name))
}

/// A provider record before normalization.
///
/// Providers disagree on field names and on which fields they fill in, so
/// every field is optional here and the fallback rules live in
/// [`crate::ingest::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    pub source_id: Option<String>,
    pub source_name: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub published_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_lenient_maps_unknown_to_general() {
        assert_eq!(Category::parse_lenient("sports"), Category::Sports);
        assert_eq!(Category::parse_lenient("Technology"), Category::Technology);
        assert_eq!(Category::parse_lenient("entertainment"), Category::General);
        assert_eq!(Category::parse_lenient(""), Category::General);
    }

    #[test]
    fn test_category_from_str_is_strict() {
        assert!("weather".parse::<Category>().is_err());
        assert_eq!("world".parse::<Category>().unwrap(), Category::World);
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!("all".parse::<Selection<Category>>().unwrap(), Selection::All);
        assert_eq!("ALL".parse::<Selection<Sentiment>>().unwrap(), Selection::All);
        assert_eq!(
            "negative".parse::<Selection<Sentiment>>().unwrap(),
            Selection::Only(Sentiment::Negative)
        );
        assert!("sideways".parse::<Selection<Sentiment>>().is_err());
    }

    #[test]
    fn test_selection_matches() {
        assert!(Selection::<Category>::All.matches(&Category::Health));
        assert!(Selection::Only(Category::Health).matches(&Category::Health));
        assert!(!Selection::Only(Category::Health).matches(&Category::World));
    }

    #[test]
    fn test_article_serialization_uses_dashboard_keys() {
        let article = Article {
            id: "aHR0cHM6Ly9l".to_string(),
            title: "Title".to_string(),
            description: "Description".to_string(),
            content: "Content".to_string(),
            url: "https://example.com/a".to_string(),
            image_url: "https://images.unsplash.com/x".to_string(),
            published_at: "2025-05-06T14:30:00Z".parse().unwrap(),
            source: ArticleSource {
                id: None,
                name: "Example".to_string(),
            },
            author: None,
            category: Category::Finance,
            sentiment: Sentiment::Neutral,
        };

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["urlToImage"], "https://images.unsplash.com/x");
        assert_eq!(json["publishedAt"], "2025-05-06T14:30:00Z");
        assert_eq!(json["category"], "finance");
        assert_eq!(json["sentiment"], "neutral");
        assert!(json["author"].is_null());

        let back: Article = serde_json::from_value(json).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn test_article_with_unknown_category_loads_as_general() {
        let json = r#"{
            "id": "x",
            "title": "t",
            "description": "d",
            "content": "c",
            "url": "https://example.com",
            "urlToImage": "https://via.placeholder.com/1",
            "publishedAt": "2025-05-06T08:00:00Z",
            "source": {"id": "ent", "name": "n"},
            "author": null,
            "category": "entertainment",
            "sentiment": "neutral"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.category, Category::General);
    }

    #[test]
    fn test_article_accepts_image_url_alias() {
        let json = r#"{
            "id": "x",
            "title": "t",
            "description": "d",
            "content": "c",
            "url": "https://example.com",
            "imageUrl": "https://via.placeholder.com/1",
            "publishedAt": "2025-05-06T08:00:00Z",
            "source": {"id": null, "name": "n"},
            "author": "A. Writer",
            "category": "sports",
            "sentiment": "positive"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.image_url, "https://via.placeholder.com/1");
        assert_eq!(article.author.as_deref(), Some("A. Writer"));
        assert_eq!(article.category, Category::Sports);
    }
}
