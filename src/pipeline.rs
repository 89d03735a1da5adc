//! One refresh cycle: fetch, publish to the store, write the snapshot.
//!
//! At most one refresh runs at a time per [`Pipeline`]. A caller that asks
//! for a refresh while one is in flight gets `None` back straight away
//! rather than queueing a second fetch behind the first.
//!
//! Pipelines sharing one [`ArticleStore`] are ordered by generation ticket:
//! the snapshot file is only written after the store accepted the set, and
//! only while that set is still the newest one.

use crate::models::Category;
use crate::outputs::snapshot::{SentimentCounts, Snapshot, write_snapshot};
use crate::providers::{NewsProvider, fetch_all};
use crate::scheduler::Clock;
use crate::sentiment::{MatchMode, SentimentScorer};
use crate::store::ArticleStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Outcome of one completed refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub generation: u64,
    pub total: usize,
    pub sentiments: SentimentCounts,
    /// False when a newer refresh had already published.
    pub published: bool,
    pub snapshot_written: bool,
}

/// Fetches from one provider into a shared [`ArticleStore`], optionally
/// mirroring every accepted set to a snapshot file.
pub struct Pipeline<P, C> {
    provider: P,
    clock: C,
    store: Arc<ArticleStore>,
    categories: Vec<Category>,
    scorer: &'static SentimentScorer,
    concurrency: usize,
    snapshot_path: Option<PathBuf>,
    in_flight: Mutex<()>,
}

impl<P, C> Pipeline<P, C>
where
    P: NewsProvider + Send + Sync,
    C: Clock,
{
    /// A pipeline over every fetched category with substring matching,
    /// sequential fetches and no snapshot file.
    pub fn new(provider: P, clock: C, store: Arc<ArticleStore>) -> Self {
        Self {
            provider,
            clock,
            store,
            categories: Category::FETCHED.to_vec(),
            scorer: SentimentScorer::for_mode(MatchMode::default()),
            concurrency: 1,
            snapshot_path: None,
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.scorer = SentimentScorer::for_mode(mode);
        self
    }

    /// Categories fetched at once; clamped to at least 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Mirror every accepted set to this JSON file.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run one refresh unless another is already in flight.
    ///
    /// # Returns
    /// `None` when this pipeline is already refreshing. Fetch failures never
    /// surface here; a failed category contributes zero articles and a failed
    /// snapshot write shows up as `snapshot_written: false`.
    #[instrument(level = "info", skip_all, fields(provider = self.provider.name()))]
    pub async fn refresh(&self) -> Option<RefreshReport> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Refresh already in flight; skipping");
            return None;
        };

        let t0 = Instant::now();
        let generation = self.store.ticket();
        info!(
            generation,
            categories = self.categories.len(),
            match_mode = ?self.scorer.mode(),
            "Starting news refresh"
        );

        let articles = fetch_all(&self.provider, &self.categories, self.scorer, self.concurrency).await;
        let snapshot = Snapshot::build(articles, &self.categories, self.clock.now());

        let published = self
            .store
            .publish(generation, snapshot.articles.clone(), snapshot.last_updated)
            .await;

        let snapshot_written = match &self.snapshot_path {
            Some(path) if published => {
                match self.store.persist(generation, || write_snapshot(&snapshot, path)).await {
                    Ok(written) => written,
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "Failed to write snapshot");
                        false
                    }
                }
            }
            _ => false,
        };

        let report = RefreshReport {
            generation,
            total: snapshot.total_articles,
            sentiments: snapshot.sentiments,
            published,
            snapshot_written,
        };
        info!(
            generation,
            total = report.total,
            categories = ?snapshot.categories,
            elapsed_ms = t0.elapsed().as_millis(),
            "News refresh complete"
        );
        Some(report)
    }
}
