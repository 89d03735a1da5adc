//! The in-memory article set shared between the refresher and readers.
//!
//! A refresh takes a generation ticket *before* it starts fetching and
//! publishes with that ticket when done. A publish only lands if its ticket
//! is newer than the set currently held, so a slow refresh that started
//! earlier can never overwrite the result of one that started later.
//!
//! Persisting follows the same rule: [`ArticleStore::persist`] serializes
//! writers and only runs a write for the generation currently held.

use crate::models::Article;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// One published article set.
#[derive(Debug, Default)]
pub struct ArticleSet {
    /// Ticket of the refresh that produced this set; 0 before the first publish.
    pub generation: u64,
    pub articles: Vec<Article>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Latest published article set, shared by every pipeline that refreshes it.
///
/// Cloned behind an [`Arc`]; readers get the set that was current when they
/// asked and never block a publish for longer than the pointer swap.
#[derive(Debug, Default)]
pub struct ArticleStore {
    next_ticket: AtomicU64,
    current: RwLock<Arc<ArticleSet>>,
    /// Generation last persisted; held for the duration of a write.
    persisted: Mutex<u64>,
}

impl ArticleStore {
    /// An empty store at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next generation number. Tickets start at 1.
    pub fn ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the held set if `generation` is newer. Returns whether it landed.
    pub async fn publish(&self, generation: u64, articles: Vec<Article>, updated_at: DateTime<Utc>) -> bool {
        let mut current = self.current.write().await;
        if generation <= current.generation {
            warn!(
                generation,
                held = current.generation,
                "Discarding stale article set"
            );
            return false;
        }
        debug!(generation, count = articles.len(), "Publishing article set");
        *current = Arc::new(ArticleSet {
            generation,
            articles,
            updated_at: Some(updated_at),
        });
        true
    }

    /// Run `write` for `generation` if that generation is still the one held.
    ///
    /// Writers are serialized. A write is skipped when a newer generation has
    /// been published or persisted since, so the file on disk always trails
    /// the store and never moves backwards.
    ///
    /// # Returns
    /// `Ok(true)` when `write` ran and succeeded, `Ok(false)` when skipped.
    ///
    /// # Errors
    /// Whatever `write` returns.
    pub async fn persist<F, Fut, E>(&self, generation: u64, write: F) -> Result<bool, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let mut persisted = self.persisted.lock().await;
        let held = self.current.read().await.generation;
        if generation != held || generation <= *persisted {
            debug!(generation, held, persisted = *persisted, "Skipping stale snapshot write");
            return Ok(false);
        }
        write().await?;
        *persisted = generation;
        Ok(true)
    }

    /// The set held right now.
    pub async fn snapshot(&self) -> Arc<ArticleSet> {
        Arc::clone(&*self.current.read().await)
    }
}
