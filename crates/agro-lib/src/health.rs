//! Health tracking for the dashboard
//!
//! Records whether the dataset loaded and the model fitted, and answers
//! liveness and readiness probes from that state.

use crate::error::AgroError;
use crate::trainer::TrainedModel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component produced its result
    Healthy,
    /// Result is usable but of doubtful quality
    Degraded,
    /// Component failed; dependent views show an error
    Unhealthy,
}

/// Information about a component's health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    fn with_status(status: ComponentStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn healthy() -> Self {
        Self::with_status(ComponentStatus::Healthy, None)
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Degraded, Some(message.into()))
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_status(ComponentStatus::Unhealthy, Some(message.into()))
    }

    /// Health of the trainer derived from its outcome
    ///
    /// A model with a negative or undefined R² predicts worse than the mean
    /// yield and is reported as degraded.
    pub fn from_fit(outcome: &Result<Arc<TrainedModel>, AgroError>) -> Self {
        match outcome {
            Ok(trained) if trained.metrics.r2.is_finite() && trained.metrics.r2 >= 0.0 => {
                Self::healthy()
            }
            Ok(trained) if trained.metrics.r2.is_nan() => Self::degraded(format!(
                "R² is undefined on {} held-out row(s)",
                trained.test_rows
            )),
            Ok(trained) => Self::degraded(format!(
                "model explains less variance than the mean (R² = {:.3})",
                trained.metrics.r2
            )),
            Err(e) => Self::unhealthy(e.to_string()),
        }
    }
}

/// Overall health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: HashMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Worst status across all components
    pub fn compute_status(components: &HashMap<String, ComponentHealth>) -> ComponentStatus {
        components
            .values()
            .map(|h| h.status)
            .fold(ComponentStatus::Healthy, |worst, status| match (worst, status) {
                (ComponentStatus::Unhealthy, _) | (_, ComponentStatus::Unhealthy) => {
                    ComponentStatus::Unhealthy
                }
                (ComponentStatus::Degraded, _) | (_, ComponentStatus::Degraded) => {
                    ComponentStatus::Degraded
                }
                _ => ComponentStatus::Healthy,
            })
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const DATA_LOADER: &str = "data_loader";
    pub const TRAINER: &str = "trainer";
}

/// Health registry shared between startup and the HTTP handlers
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<HashMap<String, ComponentHealth>>>,
    ready: Arc<RwLock<bool>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with initial healthy status
    pub async fn register(&self, name: &str) {
        self.update(name, ComponentHealth::healthy()).await;
    }

    pub async fn update(&self, name: &str, health: ComponentHealth) {
        self.components.write().await.insert(name.to_string(), health);
    }

    /// Record the outcome of a pipeline step
    pub async fn record<T>(&self, name: &str, outcome: &Result<T, AgroError>) {
        let health = match outcome {
            Ok(_) => ComponentHealth::healthy(),
            Err(e) => ComponentHealth::unhealthy(e.to_string()),
        };
        self.update(name, health).await;
    }

    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    pub async fn health(&self) -> HealthResponse {
        let components = self.components.read().await.clone();
        let status = HealthResponse::compute_status(&components);
        HealthResponse { status, components }
    }

    /// Ready once startup finished and no component is unhealthy
    pub async fn readiness(&self) -> ReadinessResponse {
        let ready = *self.ready.read().await;
        let health = self.health().await;

        let reason = if !ready {
            Some("Dashboard not yet initialized".to_string())
        } else if health.status == ComponentStatus::Unhealthy {
            Some("Dataset or model unavailable".to_string())
        } else {
            None
        };

        ReadinessResponse {
            ready: reason.is_none(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainer::{LinearModel, RegressionMetrics};

    fn fitted(r2: f64) -> Result<Arc<TrainedModel>, AgroError> {
        Ok(Arc::new(TrainedModel {
            model: LinearModel {
                weights: [0.0; 4],
                bias: 0.0,
            },
            metrics: RegressionMetrics {
                mae: 1.0,
                mse: 1.0,
                rmse: 1.0,
                r2,
            },
            test_inputs: Vec::new(),
            test_actuals: Vec::new(),
            test_predictions: Vec::new(),
            train_rows: 1,
            test_rows: 1,
        }))
    }

    #[tokio::test]
    async fn test_initial_state() {
        let registry = HealthRegistry::new();
        let health = registry.health().await;

        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components.is_empty());
        assert!(!registry.readiness().await.ready);
    }

    #[tokio::test]
    async fn test_record_failure_marks_unhealthy() {
        let registry = HealthRegistry::new();
        registry.register(components::DATA_LOADER).await;
        registry.register(components::TRAINER).await;

        let outcome: Result<(), AgroError> = Err(AgroError::InsufficientData { rows: 1 });
        registry.record(components::TRAINER, &outcome).await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        let trainer = &health.components[components::TRAINER];
        assert!(trainer.message.as_deref().unwrap().contains("insufficient data"));
    }

    #[tokio::test]
    async fn test_readiness_follows_components() {
        let registry = HealthRegistry::new();
        registry.register(components::DATA_LOADER).await;
        registry.set_ready(true).await;
        assert!(registry.readiness().await.ready);

        registry
            .update(
                components::DATA_LOADER,
                ComponentHealth::unhealthy("dados_agricolas.csv not found"),
            )
            .await;
        let readiness = registry.readiness().await;
        assert!(!readiness.ready);
        assert_eq!(readiness.reason.as_deref(), Some("Dataset or model unavailable"));
    }

    #[test]
    fn test_fit_health() {
        assert_eq!(
            ComponentHealth::from_fit(&fitted(0.8)).status,
            ComponentStatus::Healthy
        );
        assert_eq!(
            ComponentHealth::from_fit(&fitted(-0.4)).status,
            ComponentStatus::Degraded
        );
        assert_eq!(
            ComponentHealth::from_fit(&Err(AgroError::InsufficientData { rows: 0 })).status,
            ComponentStatus::Unhealthy
        );
    }

    #[test]
    fn test_undefined_r2_is_degraded() {
        let health = ComponentHealth::from_fit(&fitted(f64::NAN));
        assert_eq!(health.status, ComponentStatus::Degraded);
    }

    #[tokio::test]
    async fn test_degraded_is_still_ready() {
        let registry = HealthRegistry::new();
        registry
            .update(components::TRAINER, ComponentHealth::from_fit(&fitted(-1.0)))
            .await;
        registry.set_ready(true).await;

        assert_eq!(registry.health().await.status, ComponentStatus::Degraded);
        assert!(registry.readiness().await.ready);
    }
}
