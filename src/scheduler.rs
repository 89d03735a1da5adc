//! Timer-driven refresh loop.
//!
//! [`Scheduler::start`] spawns a task that refreshes immediately and then
//! once per interval until [`Scheduler::stop`] is called. Time comes from an
//! injectable [`Clock`], so tests can run the loop under a paused tokio clock
//! or a fixed wall time.

use crate::error::SchedulerError;
use crate::pipeline::Pipeline;
use crate::providers::NewsProvider;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Source of wall time and delays.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;

    fn sleep(&self, period: Duration) -> impl Future<Output = ()> + Send;
}

/// Real time: `Utc::now` and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, period: Duration) {
        tokio::time::sleep(period).await
    }
}

struct Running {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Runs [`Pipeline::refresh`] immediately and then on a fixed interval
/// until stopped.
pub struct Scheduler<P, C> {
    pipeline: Arc<Pipeline<P, C>>,
    running: Option<Running>,
}

impl<P, C> Scheduler<P, C>
where
    P: NewsProvider + Send + Sync + 'static,
    C: Clock,
{
    pub fn new(pipeline: Arc<Pipeline<P, C>>) -> Self {
        Self {
            pipeline,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Spawn the refresh loop.
    pub fn start(&mut self, interval: Duration) -> Result<(), SchedulerError> {
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        if self.running.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let (shutdown, mut stopped) = watch::channel(false);
        let pipeline = Arc::clone(&self.pipeline);
        let handle = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Refresh scheduler started");
            loop {
                match pipeline.refresh().await {
                    Some(report) => debug!(?report, "Scheduled refresh finished"),
                    None => debug!("Scheduled refresh skipped; another refresh is running"),
                }
                tokio::select! {
                    _ = pipeline.clock().sleep(interval) => {}
                    _ = stopped.changed() => break,
                }
            }
            info!("Refresh scheduler stopped");
        });

        self.running = Some(Running { shutdown, handle });
        Ok(())
    }

    /// Signal the loop to exit and wait for it. An in-flight refresh is
    /// allowed to finish first. No-op when not running.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let _ = running.shutdown.send(true);
        if let Err(e) = running.handle.await {
            warn!(error = %e, "Refresh scheduler task ended abnormally");
        }
    }
}
