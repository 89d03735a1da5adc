//! Client-side style filtering of an article set.
//!
//! An article survives when all three predicates hold: its category matches,
//! its sentiment matches, and the free-text query (if any) appears
//! case-insensitively in its title or description. Filtering is stable and
//! never touches the input slice.

use crate::models::{Article, Category, Selection, Sentiment};

/// The three filter parameters. [`Default`] matches every article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Selection<Category>,
    pub sentiment: Selection<Sentiment>,
    pub query: String,
}

impl FilterState {
    pub fn matches(&self, article: &Article) -> bool {
        self.category.matches(&article.category)
            && self.sentiment.matches(&article.sentiment)
            && text_matches(article, &self.query)
    }

    pub fn apply(&self, articles: &[Article]) -> Vec<Article> {
        articles
            .iter()
            .filter(|article| self.matches(article))
            .cloned()
            .collect()
    }
}

fn text_matches(article: &Article, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    article.title.to_lowercase().contains(&needle)
        || article.description.to_lowercase().contains(&needle)
}

/// Return the articles matching `category`, `sentiment` and `query`, in input order.
pub fn filter_articles(
    articles: &[Article],
    category: Selection<Category>,
    sentiment: Selection<Sentiment>,
    query: &str,
) -> Vec<Article> {
    FilterState {
        category,
        sentiment,
        query: query.to_string(),
    }
    .apply(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleSource;

    fn article(id: &str, title: &str, description: &str, category: Category, sentiment: Sentiment) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            content: String::new(),
            url: format!("https://example.com/{id}"),
            image_url: String::new(),
            published_at: Default::default(),
            source: ArticleSource {
                id: None,
                name: "Example".to_string(),
            },
            author: None,
            category,
            sentiment,
        }
    }

    fn sample() -> Vec<Article> {
        vec![
            article("1", "Chip maker posts record profit", "Quarterly results", Category::Technology, Sentiment::Positive),
            article("2", "Storm hits coast", "Flooding reported in several towns", Category::World, Sentiment::Negative),
            article("3", "New clinic opens", "Health services expand in the city", Category::Health, Sentiment::Neutral),
            article("4", "Markets steady", "Chip stocks flat after rally", Category::Finance, Sentiment::Neutral),
            article("5", "Cup final tonight", "Fans gather downtown", Category::Sports, Sentiment::Positive),
        ]
    }

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_match_everything_returns_input() {
        let articles = sample();
        let out = filter_articles(&articles, Selection::All, Selection::All, "");
        assert_eq!(out, articles);
    }

    #[test]
    fn test_category_only() {
        let articles = sample();
        let out = filter_articles(&articles, Selection::Only(Category::Health), Selection::All, "");
        assert_eq!(ids(&out), vec!["3"]);
    }

    #[test]
    fn test_sentiment_only_preserves_order() {
        let articles = sample();
        let out = filter_articles(&articles, Selection::All, Selection::Only(Sentiment::Positive), "");
        assert_eq!(ids(&out), vec!["1", "5"]);
    }

    #[test]
    fn test_query_matches_title_or_description_case_insensitively() {
        let articles = sample();
        let out = filter_articles(&articles, Selection::All, Selection::All, "CHIP");
        assert_eq!(ids(&out), vec!["1", "4"]);
    }

    #[test]
    fn test_query_does_not_search_content() {
        let mut articles = sample();
        articles[1].content = "unicorn".to_string();
        let out = filter_articles(&articles, Selection::All, Selection::All, "unicorn");
        assert!(out.is_empty());
    }

    #[test]
    fn test_all_predicates_must_hold() {
        let articles = sample();
        let out = filter_articles(
            &articles,
            Selection::Only(Category::Finance),
            Selection::Only(Sentiment::Positive),
            "chip",
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let articles = sample();
        let state = FilterState {
            category: Selection::All,
            sentiment: Selection::Only(Sentiment::Neutral),
            query: "s".to_string(),
        };
        let once = state.apply(&articles);
        let twice = state.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_partition_is_exact() {
        let articles = sample();
        let state = FilterState {
            category: Selection::All,
            sentiment: Selection::Only(Sentiment::Positive),
            query: "o".to_string(),
        };
        let kept = state.apply(&articles);
        for a in &articles {
            let survived = kept.iter().any(|k| k.id == a.id);
            assert_eq!(survived, state.matches(a), "article {}", a.id);
        }
    }

    #[test]
    fn test_input_is_untouched() {
        let articles = sample();
        let before = articles.clone();
        let _ = filter_articles(&articles, Selection::Only(Category::World), Selection::All, "storm");
        assert_eq!(articles, before);
    }
}
