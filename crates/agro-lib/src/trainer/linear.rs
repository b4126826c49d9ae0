//! Ordinary least squares with intercept

use super::{Matrix, Vector};
use crate::models::{Features, NUM_FEATURES};
use linfa::{traits::Fit, Dataset};
use linfa_linear::LinearRegression;
use serde::Serialize;
use tracing::{debug, warn};

/// Affine model: yield = weights · features + bias
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearModel {
    pub weights: [f64; NUM_FEATURES],
    pub bias: f64,
}

impl LinearModel {
    /// Fit on `x` (n × 4) and `y` (n) by minimizing the squared residuals
    ///
    /// With no more rows than features, or when the normal equations are
    /// singular, the weights cannot be identified and the model predicts
    /// the mean of `y`.
    pub fn fit(x: &Matrix, y: &Vector) -> Self {
        debug_assert_eq!(x.ncols(), NUM_FEATURES);
        debug_assert_eq!(x.nrows(), y.len());

        if x.nrows() <= NUM_FEATURES {
            debug!(rows = x.nrows(), "Too few rows to identify weights, using mean yield");
            return Self::mean_of(y);
        }

        let dataset = Dataset::new(x.clone(), y.clone());
        match LinearRegression::new().fit(&dataset) {
            Ok(fitted) => {
                let params = fitted.params();
                let bias = fitted.intercept();
                if params.iter().all(|w| w.is_finite()) && bias.is_finite() {
                    let mut weights = [0.0; NUM_FEATURES];
                    for (w, p) in weights.iter_mut().zip(params.iter()) {
                        *w = *p;
                    }
                    return Self { weights, bias };
                }
                warn!("Least squares fit produced non-finite weights, using mean yield");
            }
            Err(e) => warn!(error = %e, "Least squares fit failed, using mean yield"),
        }
        Self::mean_of(y)
    }

    /// Intercept-only model
    fn mean_of(y: &Vector) -> Self {
        Self {
            weights: [0.0; NUM_FEATURES],
            bias: y.mean().unwrap_or(0.0),
        }
    }

    /// Predicted yield for one input tuple
    pub fn predict_one(&self, features: &Features) -> f64 {
        self.weights
            .iter()
            .zip(features.to_array())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }

    /// Predicted yields for every row of `x`
    pub fn predict(&self, x: &Matrix) -> Vector {
        x.dot(&Vector::from(self.weights.to_vec())) + self.bias
    }
}
