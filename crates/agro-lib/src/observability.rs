//! Observability infrastructure for the dashboard
//!
//! Provides:
//! - Prometheus metrics (training and prediction latency, dataset size,
//!   model quality, simulations, advisories, view errors)
//! - Structured JSON logging with tracing

use crate::advisor::Advisory;
use crate::simulation::Simulation;
use crate::trainer::TrainedModel;
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge, GaugeVec, Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    training_latency_seconds: Histogram,
    prediction_latency_seconds: Histogram,
    dataset_rows: IntGauge,
    model_quality: GaugeVec,
    simulations_total: IntCounter,
    advisories_total: IntCounterVec,
    view_errors_total: IntCounterVec,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            training_latency_seconds: register_histogram!(
                "agro_dashboard_training_latency_seconds",
                "Time spent splitting the dataset and fitting the regression",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register training_latency_seconds"),

            prediction_latency_seconds: register_histogram!(
                "agro_dashboard_prediction_latency_seconds",
                "Time spent predicting a scenario and evaluating the rules",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            dataset_rows: register_int_gauge!(
                "agro_dashboard_dataset_rows",
                "Number of rows in the loaded dataset"
            )
            .expect("Failed to register dataset_rows"),

            model_quality: register_gauge_vec!(
                "agro_dashboard_model_quality",
                "Hold-out quality metrics of the fitted model",
                &["metric"]
            )
            .expect("Failed to register model_quality"),

            simulations_total: register_int_counter!(
                "agro_dashboard_simulations_total",
                "Total number of scenario simulations"
            )
            .expect("Failed to register simulations_total"),

            advisories_total: register_int_counter_vec!(
                "agro_dashboard_advisories_total",
                "Recommendations emitted, by category",
                &["category"]
            )
            .expect("Failed to register advisories_total"),

            view_errors_total: register_int_counter_vec!(
                "agro_dashboard_view_errors_total",
                "Views rendered with an error in place of their content",
                &["kind"]
            )
            .expect("Failed to register view_errors_total"),
        }
    }
}

/// Dashboard metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    /// Create a metrics handle, registering the metrics on first call
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new)
    }

    pub fn observe_training_latency(&self, duration_secs: f64) {
        self.inner().training_latency_seconds.observe(duration_secs);
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn set_dataset_rows(&self, rows: usize) {
        self.inner().dataset_rows.set(rows as i64);
    }

    /// Publish the hold-out metrics of a freshly fitted model
    pub fn set_model_quality(&self, trained: &TrainedModel) {
        let gauge = &self.inner().model_quality;
        gauge.reset();
        for (name, value) in [
            ("mae", trained.metrics.mae),
            ("mse", trained.metrics.mse),
            ("rmse", trained.metrics.rmse),
            ("r2", trained.metrics.r2),
        ] {
            gauge.with_label_values(&[name]).set(value);
        }
    }

    /// Count a simulation and the advisories it produced
    pub fn record_simulation(&self, advisories: &[Advisory]) {
        let inner = self.inner();
        inner.simulations_total.inc();
        for advisory in advisories {
            inner
                .advisories_total
                .with_label_values(&[category_label(*advisory)])
                .inc();
        }
    }

    pub fn inc_view_errors(&self, kind: &str) {
        self.inner().view_errors_total.with_label_values(&[kind]).inc();
    }
}

fn category_label(advisory: Advisory) -> &'static str {
    use crate::advisor::AdvisoryCategory;
    match advisory.category() {
        AdvisoryCategory::Humidity => "humidity",
        AdvisoryCategory::Ph => "ph",
        AdvisoryCategory::Yield => "yield",
        AdvisoryCategory::Stable => "stable",
    }
}

/// Structured logger for dashboard events
///
/// Emits event-style records with a stable `event` field so the JSON
/// output can be filtered per event type.
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str, data_path: &str) {
        info!(
            event = "dashboard_started",
            instance = %self.instance,
            version = %version,
            data_path = %data_path,
            "Crop yield dashboard started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "dashboard_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Crop yield dashboard shutting down"
        );
    }

    pub fn log_dataset_loaded(&self, path: &str, rows: usize) {
        info!(
            event = "dataset_loaded",
            instance = %self.instance,
            path = %path,
            rows = rows,
            "Dataset loaded"
        );
    }

    pub fn log_model_trained(&self, trained: &TrainedModel, elapsed_secs: f64) {
        info!(
            event = "model_trained",
            instance = %self.instance,
            train_rows = trained.train_rows,
            test_rows = trained.test_rows,
            mae = trained.metrics.mae,
            mse = trained.metrics.mse,
            rmse = trained.metrics.rmse,
            r2 = trained.metrics.r2,
            bias = trained.model.bias,
            weights = ?trained.model.weights,
            elapsed_secs = elapsed_secs,
            "Regression model fitted"
        );
    }

    /// Log a failed load or fit; the dependent views show the same message
    pub fn log_pipeline_error(&self, stage: &str, kind: &str, details: &str) {
        warn!(
            event = "pipeline_error",
            instance = %self.instance,
            stage = %stage,
            kind = %kind,
            details = %details,
            "Dashboard data pipeline failed"
        );
    }

    pub fn log_simulation(&self, simulation: &Simulation) {
        let advisories: Vec<&str> = simulation
            .recommendations
            .iter()
            .map(|a| a.message())
            .collect();
        info!(
            event = "simulation_run",
            instance = %self.instance,
            humidity = simulation.scenario.humidity,
            ph = simulation.scenario.ph,
            irrigation = simulation.scenario.irrigation,
            fertilizer = simulation.scenario.fertilizer,
            predicted_yield = simulation.predicted_yield,
            advisories = ?advisories,
            "Scenario simulated"
        );
    }

    /// Log a scenario that bypassed the bounded input controls
    pub fn log_contract_violation(&self, details: &str) {
        error!(
            event = "scenario_contract_violation",
            instance = %self.instance,
            details = %details,
            "Scenario input outside the control bounds"
        );
    }
}
