//! Scrape Scheduler
//!
//! Drives the storage box collector on a fixed cadence:
//!
//! ```text
//! Idle -> Scraping -> Sleeping -> Scraping -> ... -> Stopped
//! ```
//!
//! - Scrapes run one at a time from a single sequential loop, so they never overlap.
//! - A failed scrape is logged and the loop carries on at the normal interval.
//!   There is no backoff; the fixed cadence already rate-limits API calls.
//! - After every attempt, successful or not, the shared [`Readiness`] flag is set.
//! - Shutdown is observed while fetching and while sleeping. A fetch interrupted
//!   by shutdown is dropped before it touches the metrics.

use crate::collectors::{self, CollectionContext};
use crate::error::Result;
use crate::hetzner::StorageBoxSource;
use crate::metrics::MetricsCollector;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

/// Process-wide "at least one scrape attempted" flag
///
/// Starts false and only ever transitions to true.
#[derive(Clone, Default)]
pub struct Readiness(Arc<AtomicBool>);

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct ScrapeScheduler {
    source: Arc<dyn StorageBoxSource>,
    metrics: MetricsCollector,
    readiness: Readiness,
    interval: Duration,
    scrape_timeout: Duration,
}

impl ScrapeScheduler {
    pub fn new(
        source: Arc<dyn StorageBoxSource>,
        metrics: MetricsCollector,
        readiness: Readiness,
        interval: Duration,
        scrape_timeout: Duration,
    ) -> Self {
        Self {
            source,
            metrics,
            readiness,
            interval,
            scrape_timeout,
        }
    }

    /// Run one scrape attempt and record its outcome
    pub async fn scrape_once(&self) -> Result<usize> {
        let ctx = CollectionContext {
            source: self.source.as_ref(),
            metrics: &self.metrics,
            timeout: self.scrape_timeout,
        };

        let result = collectors::collect_storage_box_metrics(&ctx).await;
        match &result {
            Ok(count) => {
                info!(storage_boxes = count, "scrape completed");
                self.metrics.up.set(1.0);
            }
            Err(e) => {
                error!(error = %e, "scrape failed");
                self.metrics.up.set(0.0);
            }
        }
        self.readiness.mark_ready();

        result
    }

    /// Scrape until `shutdown` turns true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval = ?self.interval, timeout = ?self.scrape_timeout, "starting scrape loop");

        loop {
            tokio::select! {
                _ = self.scrape_once() => {}
                _ = shutdown_requested(&mut shutdown) => {
                    info!("scrape interrupted by shutdown");
                    break;
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown_requested(&mut shutdown) => break,
            }
        }

        info!("stopping scrape loop");
    }
}

/// Resolves once shutdown is signalled or can no longer be signalled
pub(crate) async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
