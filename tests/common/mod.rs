//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use storage_box_exporter::error::{ExporterError, Result};
use storage_box_exporter::hetzner::{
    StorageBox, StorageBoxSource, StorageBoxStats, StorageBoxStatus,
};
use storage_box_exporter::metrics::MetricsCollector;

pub fn create_test_metrics() -> MetricsCollector {
    MetricsCollector::new().expect("Failed to create metrics")
}

pub fn storage_box(name: &str, status: StorageBoxStatus, size: u64, data: u64, snaps: u64) -> StorageBox {
    StorageBox {
        name: name.to_string(),
        status,
        stats: StorageBoxStats {
            size,
            size_data: data,
            size_snapshots: snaps,
        },
        ..Default::default()
    }
}

/// Replays a fixed sequence of responses, then repeats the last one
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<StorageBox>>>>,
    last: Mutex<Option<Vec<StorageBox>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Vec<StorageBox>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(boxes: Vec<StorageBox>) -> Self {
        Self::new(vec![Ok(boxes)])
    }

    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBoxSource for ScriptedSource {
    async fn list_storage_boxes(&self) -> Result<Vec<StorageBox>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(boxes)) => {
                *self.last.lock().unwrap() = Some(boxes.clone());
                Ok(boxes)
            }
            Some(Err(e)) => Err(e),
            None => match self.last.lock().unwrap().clone() {
                Some(boxes) => Ok(boxes),
                None => Err(ExporterError::HetznerApi("service unavailable".to_string())),
            },
        }
    }
}

/// Never answers, like a provider that accepted the connection and hung
pub struct HangingSource {
    calls: AtomicUsize,
}

impl HangingSource {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBoxSource for HangingSource {
    async fn list_storage_boxes(&self) -> Result<Vec<StorageBox>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Count rendered sample lines carrying the given box label
pub fn series_for(rendered: &str, name: &str) -> Vec<String> {
    let needle = format!("storage-box=\"{}\"", name);
    rendered
        .lines()
        .filter(|line| !line.starts_with('#') && line.contains(&needle))
        .map(str::to_string)
        .collect()
}
