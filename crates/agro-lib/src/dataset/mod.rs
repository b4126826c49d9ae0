//! Agricultural dataset handling
//!
//! This module provides the typed dataset container, the synthetic data
//! generator, the CSV loader and descriptive statistics.

mod generator;
mod loader;
mod stats;

pub use generator::{
    expected_yield, generate_samples, generate_to_path, write_csv, GeneratorConfig, DEFAULT_ROWS,
    DEFAULT_SEED, NOISE_STD_DEV,
};
pub use loader::load_dataset;
pub use stats::{correlation_matrix, describe, ColumnSummary, CorrelationMatrix};

use crate::models::{Column, Sample};
use serde::Serialize;

/// Fixed relative path shared by the generator and the dashboard
pub const DATA_FILE: &str = "dados_agricolas.csv";

/// Number of rows shown in the data preview
pub const PREVIEW_ROWS: usize = 5;

/// Ordered, read-only sequence of samples
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First `n` rows (fewer if the dataset is shorter)
    pub fn head(&self, n: usize) -> &[Sample] {
        &self.samples[..n.min(self.samples.len())]
    }

    /// All values of one column, in row order
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.samples.iter().map(|s| s.value(column)).collect()
    }
}
