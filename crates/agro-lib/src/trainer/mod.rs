//! Regression trainer
//!
//! Splits a dataset into seeded train/test partitions, fits an ordinary
//! least squares model on the train rows and evaluates it on the held-out
//! rows.

mod linear;
mod metrics;
mod split;

pub use linear::LinearModel;
pub use metrics::{mean_absolute_error, mean_squared_error, r2_score, RegressionMetrics};
pub use split::{test_size, train_test_split, Split, SPLIT_SEED, TEST_PERCENT};

use crate::dataset::Dataset;
use crate::error::AgroError;
use crate::models::{Features, NUM_FEATURES};
use ndarray::{Array1, Array2};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

/// Minimum number of rows required to split and fit
pub const MIN_TRAINING_ROWS: usize = 2;

/// A fitted model together with its hold-out evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainedModel {
    pub model: LinearModel,
    pub metrics: RegressionMetrics,
    pub test_inputs: Vec<Features>,
    pub test_actuals: Vec<f64>,
    pub test_predictions: Vec<f64>,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl TrainedModel {
    /// Predicted yield for one input tuple
    pub fn predict(&self, features: &Features) -> f64 {
        self.model.predict_one(features)
    }

    /// Range of the held-out actual yields, used for the y = x reference line
    pub fn actual_range(&self) -> Option<(f64, f64)> {
        self.test_actuals.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Fit and evaluate a model on `dataset`
pub fn train(dataset: &Dataset) -> Result<TrainedModel, AgroError> {
    let rows = dataset.len();
    if rows < MIN_TRAINING_ROWS {
        return Err(AgroError::InsufficientData { rows });
    }

    let start = Instant::now();
    let split = train_test_split(rows, SPLIT_SEED);
    let (x_train, y_train) = design_matrix(dataset, &split.train);
    let (x_test, y_test) = design_matrix(dataset, &split.test);

    let model = LinearModel::fit(&x_train, &y_train);
    let y_pred = model.predict(&x_test);
    let metrics = RegressionMetrics::compute(&y_test, &y_pred);

    debug!(
        train_rows = split.train.len(),
        test_rows = split.test.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Model fitted"
    );

    Ok(TrainedModel {
        model,
        metrics,
        test_inputs: split
            .test
            .iter()
            .map(|&i| dataset.samples()[i].features())
            .collect(),
        test_actuals: y_test.to_vec(),
        test_predictions: y_pred.to_vec(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}

/// Feature matrix and target vector of the selected rows, in index order
fn design_matrix(dataset: &Dataset, indices: &[usize]) -> (Matrix, Vector) {
    let samples = dataset.samples();
    let mut x = Matrix::zeros((indices.len(), NUM_FEATURES));
    let mut y = Vector::zeros(indices.len());
    for (row, &i) in indices.iter().enumerate() {
        let sample = &samples[i];
        for (col, value) in sample.features().to_array().into_iter().enumerate() {
            x[[row, col]] = value;
        }
        y[row] = sample.crop_yield;
    }
    (x, y)
}
