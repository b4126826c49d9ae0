//! Core library for the crop yield advisor
//!
//! This crate provides the core functionality for:
//! - Synthetic dataset generation and CSV loading
//! - Descriptive statistics and correlation
//! - Linear regression training and hold-out evaluation
//! - Rule-based agronomic recommendations
//! - Session caching, health checks and observability

pub mod advisor;
pub mod cache;
pub mod dataset;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod simulation;
pub mod trainer;

pub use advisor::{recommend, Advisory, AdvisoryCategory};
pub use cache::SessionCache;
pub use dataset::{Dataset, DATA_FILE};
pub use error::AgroError;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{DashboardMetrics, StructuredLogger};
pub use simulation::{simulate, Simulation};
pub use trainer::{train, LinearModel, RegressionMetrics, TrainedModel};
