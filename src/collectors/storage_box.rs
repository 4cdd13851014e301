//! Storage Box Metrics Collector
//!
//! Collects status and usage statistics for every storage box.
//!
//! # Metrics Produced
//! - `storage_box_status_status` - one indicator per known status
//!   - Labels: storage-box, status
//! - `storage_box_stats_size`, `storage_box_stats_size_data`,
//!   `storage_box_stats_size_snapshots` - byte counts
//!   - Labels: storage-box

use super::CollectionContext;
use crate::error::{ExporterError, Result};
use crate::hetzner::{StorageBox, StorageBoxStatus};
use crate::metrics::MetricsCollector;
use tracing::{info, warn};

/// Write all series for one storage box
///
/// Exactly one status indicator is 1.0 for a box with a known status; a box
/// with an unrecognised status reports 0.0 for all of them.
pub fn record_storage_box(metrics: &MetricsCollector, sbx: &StorageBox) {
    for status in StorageBoxStatus::KNOWN {
        metrics.set_bool_metric(
            &metrics.storage_box_status,
            &[sbx.name.as_str(), status.as_str()],
            sbx.status == status,
        );
    }

    metrics.set_gauge(
        &metrics.storage_box_size,
        &[sbx.name.as_str()],
        sbx.stats.size as f64,
    );
    metrics.set_gauge(
        &metrics.storage_box_size_data,
        &[sbx.name.as_str()],
        sbx.stats.size_data as f64,
    );
    metrics.set_gauge(
        &metrics.storage_box_size_snapshots,
        &[sbx.name.as_str()],
        sbx.stats.size_snapshots as f64,
    );
}

/// Fetches the storage box inventory and republishes it
///
/// On success every per-box series is reset before repopulating, so boxes that
/// vanished from the inventory stop reporting. On failure (including the fetch
/// exceeding `ctx.timeout`) the sink is left untouched.
///
/// # Returns
///
/// * `Ok(n)` - `n` storage boxes were published
/// * `Err(ExporterError::Fetch(_))` - the fetch failed or timed out
pub async fn collect_storage_box_metrics(ctx: &CollectionContext<'_>) -> Result<usize> {
    let boxes = match tokio::time::timeout(ctx.timeout, ctx.source.list_storage_boxes()).await {
        Ok(Ok(boxes)) => boxes,
        Ok(Err(e)) => return Err(ExporterError::fetch(e)),
        Err(_) => return Err(ExporterError::fetch(ExporterError::Timeout(ctx.timeout))),
    };

    ctx.metrics.reset_storage_box_series();

    for sbx in &boxes {
        info!(storage_box = %sbx.name, status = %sbx.status, "adding metrics");
        if sbx.status == StorageBoxStatus::Unknown {
            warn!(storage_box = %sbx.name, "storage box reported an unrecognised status");
        }
        record_storage_box(ctx.metrics, sbx);
    }

    Ok(boxes.len())
}
