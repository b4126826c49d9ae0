//! Crop yield dashboard
//!
//! Loads the agricultural dataset, fits the regression model once and
//! serves the data, metrics and simulation views over HTTP.

use agro_lib::{
    health::{components, ComponentHealth, HealthRegistry},
    observability::{DashboardMetrics, StructuredLogger},
    SessionCache,
};
use anyhow::{Context, Result};
use dashboard::{api, DashboardConfig, Session};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DASHBOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting agro-dashboard");

    let config = DashboardConfig::load().context("Failed to load dashboard configuration")?;
    info!(
        data_path = %config.data_path,
        addr = %config.listen_address(),
        "Dashboard configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::DATA_LOADER).await;
    health_registry.register(components::TRAINER).await;

    let metrics = DashboardMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(DASHBOARD_VERSION, &config.data_path);

    // Load and fit once; failures are kept and shown by the views
    let cache = SessionCache::new();
    let session = Session::load(&cache, Path::new(&config.data_path));

    health_registry
        .record(components::DATA_LOADER, &session.dataset)
        .await;
    health_registry
        .update(components::TRAINER, ComponentHealth::from_fit(&session.trained))
        .await;

    match &session.dataset {
        Ok(dataset) => {
            metrics.set_dataset_rows(dataset.len());
            logger.log_dataset_loaded(&session.data_path, dataset.len());
        }
        Err(e) => logger.log_pipeline_error(components::DATA_LOADER, e.kind(), &e.to_string()),
    }
    match &session.trained {
        Ok(trained) => {
            let elapsed = session.fit_seconds.unwrap_or_default();
            metrics.observe_training_latency(elapsed);
            metrics.set_model_quality(trained);
            logger.log_model_trained(trained, elapsed);
        }
        // A load failure was already reported above
        Err(e) if session.dataset.is_ok() => {
            logger.log_pipeline_error(components::TRAINER, e.kind(), &e.to_string())
        }
        Err(_) => {}
    }

    let app_state = Arc::new(api::AppState::new(
        session,
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let shutdown_logger = logger;
    api::serve(config.listen_address(), app_state, async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown_logger.log_shutdown("SIGINT received"),
            Err(e) => {
                warn!(error = %e, "Cannot listen for shutdown signal");
                std::future::pending::<()>().await
            }
        }
    })
    .await?;

    info!("Shutting down");
    Ok(())
}
