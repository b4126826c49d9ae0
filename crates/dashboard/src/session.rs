//! Data prepared once at startup and shared by every request

use agro_lib::{AgroError, Dataset, SessionCache, TrainedModel};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Loaded dataset and fitted model, or the error that prevented them
///
/// A failed load is propagated into `trained` so every dependent view can
/// show the same message.
#[derive(Debug, Clone)]
pub struct Session {
    pub data_path: String,
    pub dataset: Result<Arc<Dataset>, AgroError>,
    pub trained: Result<Arc<TrainedModel>, AgroError>,
    /// Wall time of the fit, when this call performed one
    pub fit_seconds: Option<f64>,
}

impl Session {
    /// Resolve the dataset and model through the cache
    pub fn load(cache: &SessionCache, data_path: &Path) -> Self {
        let dataset = cache.dataset(data_path);

        let fits_before = cache.fits();
        let start = Instant::now();
        let trained = match &dataset {
            Ok(dataset) => cache.trained(dataset),
            Err(e) => Err(e.clone()),
        };
        let fit_seconds = (cache.fits() > fits_before).then(|| start.elapsed().as_secs_f64());

        Self {
            data_path: data_path.display().to_string(),
            dataset,
            trained,
            fit_seconds,
        }
    }
}
