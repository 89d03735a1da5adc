//! Normalization of raw provider records into [`Article`]s.
//!
//! Every raw record produces exactly one article. Missing fields are filled
//! from fixed fallbacks rather than dropping the record, image URLs are only
//! kept when their host is on the allow-list, and the category is always the
//! one the fetch was issued under.

use crate::models::{Article, ArticleSource, Category, RawArticle};
use crate::sentiment::SentimentScorer;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use url::Url;

/// Placeholders for fields a provider left out or sent empty.
pub const NO_TITLE: &str = "No title available";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_CONTENT: &str = "No content available";
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

const ID_LEN: usize = 12;

static ALLOWED_IMAGE_HOSTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "images.unsplash.com",
        "via.placeholder.com",
        "platform.theverge.com",
        "cdn1.miragenews.com",
        "img.us.news.samsung.com",
        "cdn.mos.cms.futurecdn.net",
        "mma.prnewswire.com",
        "img.global.news.samsung.com",
        "imageio.forbes.com",
        "i.pcmag.com",
        "www.fipp.com",
        "www.mei.edu",
        "i.guim.co.uk",
        "i2-prod.mirror.co.uk",
        "static.toiimg.com",
        "img2.thejournal.ie",
        "dims.apnews.com",
        "media.mehrnews.com",
        "www.rte.ie",
    ]
    .into_iter()
    .collect()
});

/// Derive an article id from its URL.
///
/// The URL bytes are base64 encoded, stripped to ASCII alphanumerics and cut
/// to twelve characters. Distinct URLs sharing their first nine bytes map to
/// the same id; [`finalize_batch`] resolves such collisions within a batch.
pub fn make_id(url: &str) -> String {
    STANDARD
        .encode(url.as_bytes())
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(ID_LEN)
        .collect()
}

/// Whether `url` parses and its host is on the image allow-list (exact match).
pub fn is_allowed_image(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|h| ALLOWED_IMAGE_HOSTS.contains(h)))
        .unwrap_or(false)
}

/// Stock image shown for a category when the record has no usable image.
pub fn fallback_image(category: Category) -> &'static str {
    match category {
        Category::Technology => {
            "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=400&h=300&fit=crop"
        }
        Category::World => {
            "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400&h=300&fit=crop"
        }
        Category::Health => {
            "https://images.unsplash.com/photo-1576091160399-112ba8d25d1f?w=400&h=300&fit=crop"
        }
        Category::Finance => {
            "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=400&h=300&fit=crop"
        }
        Category::Sports => {
            "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=400&h=300&fit=crop"
        }
        Category::Politics => {
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=300&fit=crop"
        }
        Category::General => {
            "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=400&h=300&fit=crop"
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn parse_published_at(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Normalize one raw record using the given sentiment scorer.
pub fn normalize_with(raw: &RawArticle, category: Category, scorer: &SentimentScorer) -> Article {
    let title = present(&raw.title).unwrap_or(NO_TITLE).to_string();
    let description = present(&raw.description).unwrap_or(NO_DESCRIPTION).to_string();
    let content = present(&raw.content)
        .or_else(|| present(&raw.description))
        .unwrap_or(NO_CONTENT)
        .to_string();

    let image_url = match present(&raw.image) {
        Some(image) if is_allowed_image(image) => image.to_string(),
        _ => fallback_image(category).to_string(),
    };

    let url = raw.url.clone().unwrap_or_default();
    let sentiment = scorer.classify(&format!("{title} {description}"));

    Article {
        id: make_id(&url),
        title,
        description,
        content,
        url,
        image_url,
        published_at: parse_published_at(raw.published_at.as_deref()),
        source: ArticleSource {
            id: present(&raw.source_id).map(str::to_string),
            name: present(&raw.source_name).unwrap_or(UNKNOWN_SOURCE).to_string(),
        },
        author: present(&raw.author).map(str::to_string),
        category,
        sentiment,
    }
}

/// Normalize one raw record with default substring sentiment matching.
pub fn normalize(raw: &RawArticle, category: Category) -> Article {
    normalize_with(raw, category, SentimentScorer::for_mode(Default::default()))
}

/// Turn the concatenated per-category results into one batch.
///
/// A URL repeated within one category keeps its first occurrence; the same
/// story fetched for two categories stays in both. Ids that still collide
/// get `-2`, `-3`, ... suffixes in batch order, and the batch is stably
/// sorted newest first.
pub fn finalize_batch(articles: Vec<Article>) -> Vec<Article> {
    let before = articles.len();
    let mut batch: Vec<Article> = articles
        .into_iter()
        .enumerate()
        .unique_by(|(i, a)| {
            if a.url.is_empty() {
                Err(*i)
            } else {
                Ok((a.category, a.url.clone()))
            }
        })
        .map(|(_, a)| a)
        .collect();
    if batch.len() != before {
        debug!(dropped = before - batch.len(), "Dropped duplicate article URLs");
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    for article in batch.iter_mut() {
        let n = seen.entry(article.id.clone()).or_insert(0);
        *n += 1;
        if *n > 1 {
            article.id = format!("{}-{}", article.id, n);
        }
    }

    batch.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use crate::sentiment::MatchMode;

    fn raw(url: &str) -> RawArticle {
        RawArticle {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_make_id_known_value() {
        assert_eq!(make_id("https://example.com/a"), "aHR0cHM6Ly9l");
        assert_eq!(make_id(""), "");
    }

    #[test]
    fn test_make_id_is_short_and_alphanumeric() {
        let id = make_id("https://www.rte.ie/news/2025/0506/a?b=c&d=e");
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(id, make_id("https://www.rte.ie/news/2025/0506/a?b=c&d=e"));
    }

    #[test]
    fn test_make_id_truncation_can_collide() {
        // Documented limitation: only the first nine bytes reach the id.
        assert_eq!(make_id("https://example.com/a"), make_id("https://elsewhere.org/b"));
        assert_ne!(make_id("http://a.io"), make_id("https://a.io"));
    }

    #[test]
    fn test_allow_list_exact_host_match() {
        assert!(is_allowed_image("https://i.guim.co.uk/img/media/abc.jpg"));
        assert!(!is_allowed_image("https://evil.i.guim.co.uk/img.jpg"));
        assert!(!is_allowed_image("https://guim.co.uk/img.jpg"));
        assert!(!is_allowed_image("not a url"));
        assert!(!is_allowed_image(""));
    }

    #[test]
    fn test_missing_image_uses_category_fallback() {
        let article = normalize(&raw("https://example.com/a"), Category::Sports);
        assert_eq!(
            article.image_url,
            "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=400&h=300&fit=crop"
        );
    }

    #[test]
    fn test_unknown_category_name_uses_general_fallback() {
        let image = |name: &str| fallback_image(Category::parse_lenient(name));
        assert_eq!(image("weather"), fallback_image(Category::General));
        assert_eq!(image("sports"), fallback_image(Category::Sports));
    }

    #[test]
    fn test_fallback_images_are_distinct() {
        let images: HashSet<&str> = Category::ALL.iter().map(|c| fallback_image(*c)).collect();
        assert_eq!(images.len(), Category::ALL.len());
    }

    #[test]
    fn test_disallowed_image_is_replaced() {
        let mut r = raw("https://example.com/a");
        r.image = Some("https://cdn.example.net/pic.jpg".to_string());
        let article = normalize(&r, Category::Health);
        assert_eq!(article.image_url, fallback_image(Category::Health));

        r.image = Some("https://dims.apnews.com/pic.jpg".to_string());
        let article = normalize(&r, Category::Health);
        assert_eq!(article.image_url, "https://dims.apnews.com/pic.jpg");
    }

    #[test]
    fn test_placeholders_for_missing_fields() {
        let article = normalize(&RawArticle::default(), Category::World);
        assert_eq!(article.title, NO_TITLE);
        assert_eq!(article.description, NO_DESCRIPTION);
        assert_eq!(article.content, NO_CONTENT);
        assert_eq!(article.source.name, UNKNOWN_SOURCE);
        assert_eq!(article.source.id, None);
        assert_eq!(article.author, None);
        assert_eq!(article.url, "");
        assert_eq!(article.published_at, DateTime::<Utc>::default());
        assert_eq!(article.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_content_falls_back_to_description() {
        let mut r = raw("https://example.com/a");
        r.description = Some("A short summary".to_string());
        r.content = Some(String::new());
        let article = normalize(&r, Category::World);
        assert_eq!(article.content, "A short summary");
    }

    #[test]
    fn test_fields_carried_through() {
        let r = RawArticle {
            source_id: Some("bbc-news".to_string()),
            source_name: Some("BBC News".to_string()),
            author: Some("Jane Reporter".to_string()),
            title: Some("Vaccine breakthrough announced".to_string()),
            description: Some("Researchers report success".to_string()),
            content: Some("Full text".to_string()),
            url: Some("https://bbc.co.uk/news/1".to_string()),
            image: Some("https://images.unsplash.com/photo-1".to_string()),
            published_at: Some("2025-05-06T10:15:00+02:00".to_string()),
        };
        let article = normalize(&r, Category::Health);
        assert_eq!(article.source.id.as_deref(), Some("bbc-news"));
        assert_eq!(article.source.name, "BBC News");
        assert_eq!(article.author.as_deref(), Some("Jane Reporter"));
        assert_eq!(article.content, "Full text");
        assert_eq!(article.image_url, "https://images.unsplash.com/photo-1");
        assert_eq!(article.published_at.to_rfc3339(), "2025-05-06T08:15:00+00:00");
        assert_eq!(article.category, Category::Health);
        assert_eq!(article.sentiment, Sentiment::Positive);
        assert_eq!(article.id, make_id("https://bbc.co.uk/news/1"));
    }

    #[test]
    fn test_word_boundary_scorer_is_honoured() {
        let mut r = raw("https://example.com/a");
        r.title = Some("Warm spell".to_string());
        let loose = normalize(&r, Category::World);
        let strict = normalize_with(&r, Category::World, SentimentScorer::for_mode(MatchMode::WordBoundary));
        assert_eq!(loose.sentiment, Sentiment::Negative);
        assert_eq!(strict.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_finalize_batch_dedupes_disambiguates_and_sorts() {
        let mut a = normalize(&raw("https://example.com/one"), Category::World);
        a.published_at = "2025-05-06T08:00:00Z".parse().unwrap();
        let mut b = normalize(&raw("https://example.com/two"), Category::Finance);
        b.published_at = "2025-05-06T09:00:00Z".parse().unwrap();
        let dup = a.clone();

        let batch = finalize_batch(vec![a, b, dup]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].url, "https://example.com/two");
        assert_eq!(batch[0].id, "aHR0cHM6Ly9l-2");
        assert_eq!(batch[1].id, "aHR0cHM6Ly9l");

        let ids: HashSet<&str> = batch.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), batch.len());
    }

    #[test]
    fn test_finalize_batch_keeps_story_in_each_category() {
        let tech = normalize(&raw("https://example.com/one"), Category::Technology);
        let finance = normalize(&raw("https://example.com/one"), Category::Finance);

        let batch = finalize_batch(vec![tech, finance]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].category, Category::Technology);
        assert_eq!(batch[1].category, Category::Finance);
        assert_eq!(batch[0].id, "aHR0cHM6Ly9l");
        assert_eq!(batch[1].id, "aHR0cHM6Ly9l-2");
    }

    #[test]
    fn test_finalize_batch_sort_is_stable() {
        let mut first = normalize(&raw("https://a.example/1"), Category::World);
        let mut second = normalize(&raw("https://b.example/2"), Category::World);
        first.published_at = "2025-05-06T08:00:00Z".parse().unwrap();
        second.published_at = first.published_at;
        let batch = finalize_batch(vec![first, second]);
        assert_eq!(batch[0].url, "https://a.example/1");
        assert_eq!(batch[1].url, "https://b.example/2");
    }
}
