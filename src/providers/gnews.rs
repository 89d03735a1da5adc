//! [GNews](https://gnews.io) top-headlines client.
//!
//! One request per category. GNews has its own topic vocabulary, so finance
//! and politics are asked for as `business` and `nation`, and `general`
//! omits the topic to get the front page.

use super::{NewsProvider, read_body};
use crate::error::FetchError;
use crate::models::{Category, RawArticle};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4";

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    articles: Option<Vec<GNewsArticle>>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
    source: Option<GNewsSource>,
}

#[derive(Debug, Deserialize)]
struct GNewsSource {
    name: Option<String>,
}

impl From<GNewsArticle> for RawArticle {
    fn from(a: GNewsArticle) -> Self {
        RawArticle {
            source_id: None,
            source_name: a.source.and_then(|s| s.name),
            author: None,
            title: a.title,
            description: a.description,
            content: a.content,
            url: a.url,
            image: a.image,
            published_at: a.published_at,
        }
    }
}

/// GNews topic for a category; `None` means no topic filter.
pub fn topic_for(category: Category) -> Option<&'static str> {
    match category {
        Category::Technology => Some("technology"),
        Category::World => Some("world"),
        Category::Health => Some("health"),
        Category::Finance => Some("business"),
        Category::Sports => Some("sports"),
        Category::Politics => Some("nation"),
        Category::General => None,
    }
}

/// Decode a top-headlines body. A body without `articles` is a rejection.
pub fn parse_headlines(body: &str) -> Result<Vec<RawArticle>, FetchError> {
    let resp: HeadlinesResponse = serde_json::from_str(body)?;
    match resp.articles {
        Some(articles) => Ok(articles.into_iter().map(RawArticle::from).collect()),
        None => Err(FetchError::Rejected {
            status: "error".to_string(),
            message: resp.errors.join("; "),
        }),
    }
}

/// Client for GNews top headlines, one request per category.
#[derive(Debug, Clone)]
pub struct GNewsProvider {
    client: Client,
    base_url: String,
    token: String,
    language: String,
    max: u32,
}

impl GNewsProvider {
    /// Build a provider against [`DEFAULT_BASE_URL`]; `max` caps each response.
    pub fn new(client: Client, token: impl Into<String>, language: impl Into<String>, max: u32) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            language: language.into(),
            max,
        }
    }

    /// Override the endpoint root, without a trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl NewsProvider for GNewsProvider {
    fn name(&self) -> &'static str {
        "gnews"
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_category(&self, category: Category) -> Result<Vec<RawArticle>, FetchError> {
        let max = self.max.to_string();
        let mut params = vec![
            ("token", self.token.as_str()),
            ("lang", self.language.as_str()),
            ("max", max.as_str()),
        ];
        if let Some(topic) = topic_for(category) {
            params.push(("topic", topic));
        }

        let resp = self
            .client
            .get(format!("{}/top-headlines", self.base_url))
            .query(&params)
            .send()
            .await?;
        let body = read_body(resp).await?;
        parse_headlines(&body)
    }
}
