//! Error taxonomy shared by the loader, trainer and dashboard

use std::path::Path;
use thiserror::Error;

/// Errors surfaced by the advisor pipeline
///
/// Every variant owns its context as plain strings so a failed load or fit
/// can be cached and rendered repeatedly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgroError {
    /// The dataset file is missing, unreadable or malformed
    #[error("dataset unavailable at {path}: {reason}")]
    DataUnavailable { path: String, reason: String },

    /// Not enough rows to split into train and test partitions
    #[error("insufficient data: {rows} row(s), at least 2 are required to train")]
    InsufficientData { rows: usize },

    /// A scenario value lies outside its input control bounds
    #[error("invalid scenario input: {field} = {value} is outside [{min}, {max}]")]
    InvalidScenarioInput {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The generator could not write its output file
    #[error("failed to write dataset to {path}: {reason}")]
    DataWrite { path: String, reason: String },

    /// Generator parameters were rejected
    #[error("invalid generator configuration: {reason}")]
    InvalidGenerator { reason: String },
}

impl AgroError {
    pub(crate) fn data_unavailable(path: &Path, reason: impl ToString) -> Self {
        AgroError::DataUnavailable {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn data_write(path: &Path, reason: impl ToString) -> Self {
        AgroError::DataWrite {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AgroError::DataUnavailable { .. } => "data_unavailable",
            AgroError::InsufficientData { .. } => "insufficient_data",
            AgroError::InvalidScenarioInput { .. } => "invalid_scenario_input",
            AgroError::DataWrite { .. } => "data_write",
            AgroError::InvalidGenerator { .. } => "invalid_generator",
        }
    }
}
