//! [NewsAPI](https://newsapi.org) `everything` endpoint client.
//!
//! Each category is searched with up to two keyword queries sorted by
//! publication time; the combined results are capped at
//! [`MAX_PER_CATEGORY`]. A response whose `status` is not `"ok"` fails the
//! whole category.

use super::{NewsProvider, read_body};
use crate::error::FetchError;
use crate::models::{Category, RawArticle};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Production endpoint root; see [`NewsApiProvider::with_base_url`].
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
/// Records kept per category after both queries are merged.
pub const MAX_PER_CATEGORY: usize = 20;
const QUERIES_PER_CATEGORY: usize = 2;

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    id: Option<String>,
    name: Option<String>,
}

impl From<NewsApiArticle> for RawArticle {
    fn from(a: NewsApiArticle) -> Self {
        let (source_id, source_name) = match a.source {
            Some(s) => (s.id, s.name),
            None => (None, None),
        };
        RawArticle {
            source_id,
            source_name,
            author: a.author,
            title: a.title,
            description: a.description,
            content: a.content,
            url: a.url,
            image: a.url_to_image,
            published_at: a.published_at,
        }
    }
}

/// Search terms used for a category, most specific first.
pub fn queries_for(category: Category) -> Vec<&'static str> {
    match category {
        Category::Technology => vec!["technology", "tech", "artificial intelligence"],
        Category::World => vec!["world", "international", "global"],
        Category::Health => vec!["health", "medical", "healthcare"],
        Category::Finance => vec!["finance", "economy", "business"],
        Category::Sports => vec!["sports", "football", "basketball"],
        Category::Politics => vec!["politics", "government", "election"],
        Category::General => vec![Category::General.as_str()],
    }
}

/// Decode an `everything` response body into raw records.
pub fn parse_everything(body: &str) -> Result<Vec<RawArticle>, FetchError> {
    let resp: EverythingResponse = serde_json::from_str(body)?;
    if resp.status != "ok" {
        let message = match (resp.code, resp.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(code), None) => code,
            (None, Some(message)) => message,
            (None, None) => String::new(),
        };
        return Err(FetchError::Rejected {
            status: resp.status,
            message,
        });
    }
    Ok(resp.articles.into_iter().map(RawArticle::from).collect())
}

/// Client for NewsAPI's `everything` search.
///
/// Each category runs its first two search terms in order and keeps at most
/// [`MAX_PER_CATEGORY`] records from the combined results.
#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    page_size: u32,
}

impl NewsApiProvider {
    /// Build a provider against [`DEFAULT_BASE_URL`].
    ///
    /// `page_size` is sent per query, so one category can return up to twice
    /// that many records before the cap applies.
    pub fn new(client: Client, api_key: impl Into<String>, language: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            language: language.into(),
            page_size,
        }
    }

    /// Override the endpoint root, without a trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[instrument(level = "debug", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, FetchError> {
        let page_size = self.page_size.to_string();
        let resp = self
            .client
            .get(format!("{}/everything", self.base_url))
            .query(&[
                ("q", query),
                ("apiKey", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;
        let body = read_body(resp).await?;
        let records = parse_everything(&body)?;
        debug!(query, count = records.len(), "NewsAPI query returned");
        Ok(records)
    }
}

impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    async fn fetch_category(&self, category: Category) -> Result<Vec<RawArticle>, FetchError> {
        let mut records = Vec::new();
        for query in queries_for(category).into_iter().take(QUERIES_PER_CATEGORY) {
            records.extend(self.search(query).await?);
        }
        records.truncate(MAX_PER_CATEGORY);
        Ok(records)
    }
}
