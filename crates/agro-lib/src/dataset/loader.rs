//! CSV dataset loader
//!
//! Reads the flat file into a typed [`Dataset`]. Any structural problem
//! (missing file, wrong header, wrong field count, non-numeric or
//! non-finite value) is reported as `DataUnavailable`.

use super::Dataset;
use crate::error::AgroError;
use crate::models::{Sample, CSV_HEADER};
use std::path::Path;
use tracing::debug;

/// Load the dataset stored at `path`
pub fn load_dataset(path: &Path) -> Result<Dataset, AgroError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| AgroError::data_unavailable(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| AgroError::data_unavailable(path, e))?
        .clone();
    let header_matches = headers.len() == CSV_HEADER.len()
        && headers.iter().zip(CSV_HEADER).all(|(found, expected)| found.trim() == expected);
    if !header_matches {
        return Err(AgroError::data_unavailable(
            path,
            format!(
                "expected header '{}', found '{}'",
                CSV_HEADER.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            ),
        ));
    }

    let mut samples = Vec::new();
    for (index, record) in reader.deserialize::<Sample>().enumerate() {
        // Line 1 is the header
        let line = index + 2;
        let sample = record
            .map_err(|e| AgroError::data_unavailable(path, format!("line {}: {}", line, e)))?;
        if !sample.is_finite() {
            return Err(AgroError::data_unavailable(
                path,
                format!("line {}: non-finite value", line),
            ));
        }
        samples.push(sample);
    }

    debug!(path = %path.display(), rows = samples.len(), "Loaded dataset");
    Ok(Dataset::new(samples))
}
