//! Prometheus Metrics Definitions
//!
//! This module defines all Prometheus metrics exposed by the storage box exporter.
//!
//! # Metrics
//!
//! - `storage_box_status_status` - 1 for the box's current status, 0 for every other
//!   known status
//!   - Labels: storage-box, status
//! - `storage_box_stats_size` - Total used space in bytes
//!   - Labels: storage-box
//! - `storage_box_stats_size_data` - Space used by data in bytes
//!   - Labels: storage-box
//! - `storage_box_stats_size_snapshots` - Space used by snapshots in bytes
//!   - Labels: storage-box
//! - `storage_box_exporter_up` - 1 if the last scrape succeeded, 0 otherwise
//!
//! # Label naming
//!
//! The box label is exposed as `storage-box`. The `prometheus` crate only
//! accepts classic label names, so series are registered with `storage_box` and
//! the gathered label pairs are renamed before encoding.
//!
//! # Concurrency
//!
//! Every vector is internally synchronized per label set, so the scrape loop can
//! write while HTTP handlers render without an outer lock. A render that races
//! a scrape may observe a partially repopulated set of series.

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

const NAMESPACE: &str = "storage_box";

/// Label name registered with the `prometheus` crate
pub const STORAGE_BOX_LABEL: &str = "storage_box";

/// Label name as it appears in the exposition
pub const EXPOSED_STORAGE_BOX_LABEL: &str = "storage-box";

/// Metrics collector for storage boxes
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    pub storage_box_status: Arc<GaugeVec>,
    pub storage_box_size: Arc<GaugeVec>,
    pub storage_box_size_data: Arc<GaugeVec>,
    pub storage_box_size_snapshots: Arc<GaugeVec>,

    pub up: Arc<Gauge>,
}

impl MetricsCollector {
    pub fn new() -> crate::error::Result<Self> {
        let registry = Registry::new();

        let storage_box_status = GaugeVec::new(
            Opts::new(
                "status",
                "Storage box status (1 for the current status, 0 otherwise)",
            )
            .namespace(NAMESPACE)
            .subsystem("status"),
            &[STORAGE_BOX_LABEL, "status"],
        )?;

        let storage_box_size = GaugeVec::new(
            Opts::new("size", "Total space used by the storage box in bytes")
                .namespace(NAMESPACE)
                .subsystem("stats"),
            &[STORAGE_BOX_LABEL],
        )?;

        let storage_box_size_data = GaugeVec::new(
            Opts::new("size_data", "Space used by data on the storage box in bytes")
                .namespace(NAMESPACE)
                .subsystem("stats"),
            &[STORAGE_BOX_LABEL],
        )?;

        let storage_box_size_snapshots = GaugeVec::new(
            Opts::new(
                "size_snapshots",
                "Space used by snapshots of the storage box in bytes",
            )
            .namespace(NAMESPACE)
            .subsystem("stats"),
            &[STORAGE_BOX_LABEL],
        )?;

        let up = Gauge::with_opts(
            Opts::new(
                "up",
                "Whether the last storage box scrape succeeded (1=yes, 0=no)",
            )
            .namespace(NAMESPACE)
            .subsystem("exporter"),
        )?;

        registry.register(Box::new(storage_box_status.clone()))?;
        registry.register(Box::new(storage_box_size.clone()))?;
        registry.register(Box::new(storage_box_size_data.clone()))?;
        registry.register(Box::new(storage_box_size_snapshots.clone()))?;
        registry.register(Box::new(up.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            storage_box_status: Arc::new(storage_box_status),
            storage_box_size: Arc::new(storage_box_size),
            storage_box_size_data: Arc::new(storage_box_size_data),
            storage_box_size_snapshots: Arc::new(storage_box_size_snapshots),
            up: Arc::new(up),
        })
    }

    /// Set a labelled gauge to a value
    pub fn set_gauge(&self, gauge: &GaugeVec, labels: &[&str], value: f64) {
        gauge.with_label_values(labels).set(value);
    }

    /// Set a labelled gauge to 1.0 or 0.0
    pub fn set_bool_metric(&self, gauge: &GaugeVec, labels: &[&str], value: bool) {
        self.set_gauge(gauge, labels, if value { 1.0 } else { 0.0 });
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> crate::error::Result<String> {
        let encoder = TextEncoder::new();
        let mut metric_families = self.registry.gather();
        expose_label_names(&mut metric_families);
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| crate::error::ExporterError::Server(e.to_string()))
    }

    /// Drop every per-box series so boxes gone from the inventory disappear
    pub fn reset_storage_box_series(&self) {
        self.storage_box_status.reset();
        self.storage_box_size.reset();
        self.storage_box_size_data.reset();
        self.storage_box_size_snapshots.reset();
    }
}

/// Rename the registered box label to its exposed form on gathered families.
///
/// Only label names are touched. Values pass through to the encoder unchanged.
fn expose_label_names(families: &mut [MetricFamily]) {
    for family in families.iter_mut() {
        for metric in family.mut_metric() {
            let mut labels = metric.take_label();
            for pair in labels.iter_mut().filter(|p| p.name() == STORAGE_BOX_LABEL) {
                pair.set_name(EXPOSED_STORAGE_BOX_LABEL.to_string());
            }
            metric.set_label(labels);
        }
    }
}
