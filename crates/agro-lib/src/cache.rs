//! Process-lifetime session cache
//!
//! Holds the loaded dataset (keyed by path) and the fitted model (keyed by
//! dataset identity). Outcomes, including failures, are stored on first
//! use and never invalidated: a path is read from disk at most once and a
//! dataset is fitted at most once.

use crate::dataset::{load_dataset, Dataset};
use crate::error::AgroError;
use crate::trainer::{train, TrainedModel};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

type Cached<T> = Result<Arc<T>, AgroError>;

struct FitEntry {
    /// Keeps the keyed allocation alive so its address cannot be reused
    dataset: Arc<Dataset>,
    outcome: Cached<TrainedModel>,
}

/// Explicit cache handed to the presentation layer
#[derive(Default)]
pub struct SessionCache {
    datasets: DashMap<PathBuf, Cached<Dataset>>,
    fits: DashMap<usize, FitEntry>,
    disk_reads: AtomicU64,
    fit_runs: AtomicU64,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset stored at `path`, loading it on first request
    pub fn dataset(&self, path: &Path) -> Result<Arc<Dataset>, AgroError> {
        if let Some(entry) = self.datasets.get(path) {
            debug!(path = %path.display(), "Dataset cache hit");
            return entry.value().clone();
        }

        let entry = self.datasets.entry(path.to_path_buf()).or_insert_with(|| {
            self.disk_reads.fetch_add(1, Ordering::Relaxed);
            info!(path = %path.display(), "Loading dataset from disk");
            load_dataset(path).map(Arc::new)
        });
        entry.value().clone()
    }

    /// Fitted model for `dataset`, training on first request
    ///
    /// Calling this again with the same `Arc` returns the same model
    /// allocation without retraining.
    pub fn trained(&self, dataset: &Arc<Dataset>) -> Result<Arc<TrainedModel>, AgroError> {
        let key = Arc::as_ptr(dataset) as usize;
        if let Some(entry) = self.fits.get(&key) {
            debug_assert!(Arc::ptr_eq(&entry.dataset, dataset));
            debug!(rows = dataset.len(), "Model cache hit");
            return entry.outcome.clone();
        }

        let entry = self.fits.entry(key).or_insert_with(|| {
            self.fit_runs.fetch_add(1, Ordering::Relaxed);
            info!(rows = dataset.len(), "Training model");
            FitEntry {
                dataset: Arc::clone(dataset),
                outcome: train(dataset).map(Arc::new),
            }
        });
        entry.outcome.clone()
    }

    /// Number of times a dataset was read from disk
    pub fn disk_reads(&self) -> u64 {
        self.disk_reads.load(Ordering::Relaxed)
    }

    /// Number of times a model was fitted
    pub fn fits(&self) -> u64 {
        self.fit_runs.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{generate_to_path, GeneratorConfig};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_path_is_read_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        generate_to_path(&path, &GeneratorConfig { seed: 3, rows: 40 }).unwrap();

        let cache = SessionCache::new();
        let first = cache.dataset(&path).unwrap();

        // Removing the file does not matter once it is cached
        fs::remove_file(&path).unwrap();
        let second = cache.dataset(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.disk_reads(), 1);
    }

    #[test]
    fn test_load_failure_is_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        let cache = SessionCache::new();

        assert!(matches!(
            cache.dataset(&path),
            Err(AgroError::DataUnavailable { .. })
        ));

        generate_to_path(&path, &GeneratorConfig { seed: 3, rows: 10 }).unwrap();
        assert!(cache.dataset(&path).is_err());
        assert_eq!(cache.disk_reads(), 1);
    }

    #[test]
    fn test_same_dataset_returns_same_model() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        generate_to_path(&path, &GeneratorConfig::default()).unwrap();

        let cache = SessionCache::new();
        let dataset = cache.dataset(&path).unwrap();
        let a = cache.trained(&dataset).unwrap();
        let b = cache.trained(&dataset).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.fits(), 1);
    }

    #[test]
    fn test_distinct_dataset_instances_are_fitted_separately() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        generate_to_path(&path, &GeneratorConfig { seed: 8, rows: 30 }).unwrap();

        let cache = SessionCache::new();
        let original = cache.dataset(&path).unwrap();
        let copy = Arc::new(Dataset::clone(&original));

        let a = cache.trained(&original).unwrap();
        let b = cache.trained(&copy).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
        assert_eq!(cache.fits(), 2);
    }

    #[test]
    fn test_insufficient_data_is_reported() {
        let cache = SessionCache::new();
        let tiny = Arc::new(Dataset::default());

        assert_eq!(
            cache.trained(&tiny),
            Err(AgroError::InsufficientData { rows: 0 })
        );
        assert!(cache.trained(&tiny).is_err());
        assert_eq!(cache.fits(), 1);
    }
}
