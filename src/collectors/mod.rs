//! Metrics Collectors
//!
//! Collectors turn one fetch from the Hetzner API into a full set of gauge
//! writes on the [`MetricsCollector`].
//!
//! # Error Handling
//!
//! A failed fetch is returned to the caller *before* any series is touched, so
//! the last successfully scraped values stay visible until the next good scrape.

use crate::hetzner::StorageBoxSource;
use crate::metrics::MetricsCollector;
use std::time::Duration;

/// Shared context passed to collectors
///
/// This struct uses public fields for ergonomic access patterns.
/// All fields are immutable references, so no invariants can be violated.
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// Source of the storage box inventory
    pub source: &'a dyn StorageBoxSource,
    /// Metrics collector for updating Prometheus metrics
    pub metrics: &'a MetricsCollector,
    /// Deadline for a single fetch
    pub timeout: Duration,
}

pub mod storage_box;

pub use storage_box::{collect_storage_box_metrics, record_storage_box};
