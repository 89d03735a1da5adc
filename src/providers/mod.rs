//! Upstream news providers and the aggregate per-category fetch.
//!
//! Each provider turns one category into a list of [`RawArticle`]s. The
//! aggregate [`fetch_all`] walks the configured categories, normalizes every
//! record under the category it was fetched for, and degrades a failed
//! category to zero articles instead of failing the whole cycle.
//!
//! # Supported Providers
//!
//! | Provider | Module | Endpoint | Notes |
//! |----------|--------|----------|-------|
//! | NewsAPI | [`newsapi`] | `/v2/everything` | Two keyword queries per category, capped at 20 |
//! | GNews | [`gnews`] | `/api/v4/top-headlines` | One topic request per category |

pub mod gnews;
pub mod newsapi;

use crate::error::FetchError;
use crate::ingest::{finalize_batch, normalize_with};
use crate::models::{Article, Category, RawArticle};
use crate::sentiment::SentimentScorer;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// A source of raw articles, one request batch per category.
pub trait NewsProvider {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the raw records for one category.
    fn fetch_category(
        &self,
        category: Category,
    ) -> impl Future<Output = Result<Vec<RawArticle>, FetchError>> + Send;
}

/// Which upstream API to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Newsapi,
    Gnews,
}

/// Fetch every category from `provider` and return one sorted batch.
///
/// Up to `concurrency` categories are in flight at once (1 means strictly
/// sequential); results are concatenated in category order regardless.
#[instrument(level = "info", skip_all, fields(provider = provider.name(), categories = categories.len()))]
pub async fn fetch_all<P>(
    provider: &P,
    categories: &[Category],
    scorer: &SentimentScorer,
    concurrency: usize,
) -> Vec<Article>
where
    P: NewsProvider + Sync,
{
    let t0 = Instant::now();
    let per_category: Vec<Vec<Article>> = stream::iter(categories.iter().copied())
        .map(|category| async move {
            match provider.fetch_category(category).await {
                Ok(raw) if raw.is_empty() => {
                    warn!(%category, "Provider returned 0 articles");
                    Vec::new()
                }
                Ok(raw) => {
                    info!(%category, count = raw.len(), "Fetched category");
                    raw.iter()
                        .map(|record| normalize_with(record, category, scorer))
                        .collect()
                }
                Err(e) => {
                    error!(%category, error = %e, "Category fetch failed; continuing without it");
                    Vec::new()
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let batch = finalize_batch(per_category.into_iter().flatten().collect());
    info!(
        total = batch.len(),
        elapsed_ms = t0.elapsed().as_millis(),
        "All categories fetched"
    );
    batch
}

/// Check the HTTP status and hand back the body text.
pub(crate) async fn read_body(resp: reqwest::Response) -> Result<String, FetchError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: truncate_for_log(&body, 300),
        });
    }
    Ok(body)
}
