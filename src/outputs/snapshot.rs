//! JSON snapshot of one refresh cycle.
//!
//! The poller writes the whole article set plus aggregate counts to a single
//! file, replacing the previous snapshot each cycle:
//!
//! ```text
//! {
//!   "articles": [...],
//!   "lastUpdated": "2025-05-06T08:00:00Z",
//!   "totalArticles": 42,
//!   "categories": {"technology": 10, "world": 8, ...},
//!   "sentiments": {"positive": 12, "neutral": 20, "negative": 10}
//! }
//! ```
//!
//! The file is written to a sibling temp path and renamed over the target, so
//! readers never see a half-written snapshot.

use crate::models::{Article, Category, Sentiment};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Article count per sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn tally(articles: &[Article]) -> Self {
        let mut counts = SentimentCounts::default();
        for article in articles {
            match article.sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Neutral => counts.neutral += 1,
                Sentiment::Negative => counts.negative += 1,
            }
        }
        counts
    }
}

/// The on-disk form of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub articles: Vec<Article>,
    pub last_updated: DateTime<Utc>,
    pub total_articles: usize,
    /// Article count for every fetched category, zeros included.
    pub categories: BTreeMap<Category, usize>,
    pub sentiments: SentimentCounts,
}

impl Snapshot {
    pub fn build(articles: Vec<Article>, fetched: &[Category], last_updated: DateTime<Utc>) -> Self {
        let mut categories: BTreeMap<Category, usize> = fetched.iter().map(|c| (*c, 0)).collect();
        for (category, count) in articles.iter().map(|a| a.category).counts() {
            categories.insert(category, count);
        }

        Snapshot {
            total_articles: articles.len(),
            sentiments: SentimentCounts::tally(&articles),
            categories,
            last_updated,
            articles,
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `snapshot` to `path`, fully replacing any previous file.
///
/// Creates the parent directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), Box<dyn Error + Send + Sync>> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create snapshot dir");
            return Err(e.into());
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    info!(
        total = snapshot.total_articles,
        positive = snapshot.sentiments.positive,
        neutral = snapshot.sentiments.neutral,
        negative = snapshot.sentiments.negative,
        "Wrote snapshot"
    );
    Ok(())
}

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_snapshot(path: &Path) -> Result<Snapshot, Box<dyn Error + Send + Sync>> {
    let body = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&body)?)
}
