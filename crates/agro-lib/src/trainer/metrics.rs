//! Regression quality metrics

use super::Vector;
use serde::Serialize;

pub fn mean_absolute_error(y_true: &Vector, y_pred: &Vector) -> f64 {
    (y_true - y_pred).mapv(f64::abs).mean().unwrap_or(f64::NAN)
}

pub fn mean_squared_error(y_true: &Vector, y_pred: &Vector) -> f64 {
    (y_true - y_pred).mapv(|d| d * d).mean().unwrap_or(f64::NAN)
}

/// Coefficient of determination
///
/// Undefined (NaN) for fewer than two samples. A constant target gives 1.0
/// for a perfect fit and 0.0 otherwise.
pub fn r2_score(y_true: &Vector, y_pred: &Vector) -> f64 {
    if y_true.len() < 2 {
        return f64::NAN;
    }
    let Some(y_mean) = y_true.mean() else {
        return f64::NAN;
    };
    let ss_res = (y_true - y_pred).mapv(|d| d * d).sum();
    let ss_tot = y_true.mapv(|y| (y - y_mean) * (y - y_mean)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Hold-out metrics of a fitted model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// Compute all metrics; both vectors must have the same length
    pub fn compute(y_true: &Vector, y_pred: &Vector) -> Self {
        debug_assert_eq!(y_true.len(), y_pred.len());
        let mse = mean_squared_error(y_true, y_pred);
        Self {
            mae: mean_absolute_error(y_true, y_pred),
            mse,
            rmse: mse.sqrt(),
            r2: r2_score(y_true, y_pred),
        }
    }

    /// Metrics as labelled pairs, in display order
    pub fn labelled(&self) -> [(&'static str, f64); 4] {
        [
            ("MAE", self.mae),
            ("MSE", self.mse),
            ("RMSE", self.rmse),
            ("R²", self.r2),
        ]
    }
}
