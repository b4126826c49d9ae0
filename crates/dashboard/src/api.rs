//! HTTP API: dashboard pages, JSON endpoints, health checks and metrics

use crate::render::{self, PageQuery, ScenarioForm, SimulationOutcome};
use crate::session::Session;
use agro_lib::dataset::{
    correlation_matrix, describe, ColumnSummary, CorrelationMatrix, PREVIEW_ROWS,
};
use agro_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::{DashboardMetrics, StructuredLogger},
    simulate, AgroError, Features, RegressionMetrics, Sample, Scenario, Simulation,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Session,
    pub health_registry: HealthRegistry,
    pub metrics: DashboardMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        session: Session,
        health_registry: HealthRegistry,
        metrics: DashboardMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            session,
            health_registry,
            metrics,
            logger,
        }
    }

    /// Validate a scenario, predict its yield and derive recommendations
    pub fn run_simulation(&self, features: Features) -> Result<Simulation, AgroError> {
        let trained = self.session.trained.as_ref().map_err(Clone::clone)?;
        let scenario = Scenario::new(features).inspect_err(|e| {
            self.logger.log_contract_violation(&e.to_string());
        })?;

        let start = Instant::now();
        let simulation = simulate(trained, &scenario);
        self.metrics.observe_prediction_latency(start.elapsed().as_secs_f64());
        self.metrics.record_simulation(&simulation.recommendations);
        self.logger.log_simulation(&simulation);

        Ok(simulation)
    }
}

/// Error response of the JSON API
#[derive(Debug)]
pub struct ApiError(AgroError);

impl From<AgroError> for ApiError {
    fn from(e: AgroError) -> Self {
        Self(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

pub fn status_for(error: &AgroError) -> StatusCode {
    match error {
        AgroError::DataUnavailable { .. } | AgroError::InsufficientData { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AgroError::InvalidScenarioInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AgroError::DataWrite { .. } | AgroError::InvalidGenerator { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status_for(&self.0), Json(body)).into_response()
    }
}

/// Dashboard page; the view is picked by the `tab` query parameter
async fn page(State(state): State<Arc<AppState>>, Query(query): Query<PageQuery>) -> Response {
    let view = query.view();
    let form = ScenarioForm::from_query(&query);

    if let Some(e) = render::blocking_error(view, &state.session) {
        state.metrics.inc_view_errors(e.kind());
    }

    let outcome: Option<SimulationOutcome> = (view == render::View::Simulation
        && query.wants_calculation()
        && state.session.trained.is_ok())
    .then(|| state.run_simulation(form.features()));

    let status = match &outcome {
        Some(Err(e)) => status_for(e),
        _ => StatusCode::OK,
    };
    let html = render::render_page(view, &state.session, &form, outcome.as_ref());

    (status, Html(html)).into_response()
}

#[derive(Debug, Deserialize)]
struct DataQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct DataResponse {
    rows: usize,
    head: Vec<Sample>,
    summary: Vec<ColumnSummary>,
}

/// First rows and per-column summary of the dataset
async fn api_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<DataResponse>, ApiError> {
    let dataset = state.session.dataset.as_ref().map_err(Clone::clone)?;
    let limit = query.limit.unwrap_or(PREVIEW_ROWS);

    Ok(Json(DataResponse {
        rows: dataset.len(),
        head: dataset.head(limit).to_vec(),
        summary: describe(dataset),
    }))
}

#[derive(Serialize)]
struct Holdout {
    actual: Vec<f64>,
    predicted: Vec<f64>,
}

#[derive(Serialize)]
struct MetricsResponse {
    metrics: RegressionMetrics,
    train_rows: usize,
    test_rows: usize,
    coefficients: [f64; 4],
    intercept: f64,
    correlation: CorrelationMatrix,
    holdout: Holdout,
}

/// Hold-out metrics, correlation matrix and actual/predicted pairs
async fn api_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let dataset = state.session.dataset.as_ref().map_err(Clone::clone)?;
    let trained = state.session.trained.as_ref().map_err(Clone::clone)?;

    Ok(Json(MetricsResponse {
        metrics: trained.metrics,
        train_rows: trained.train_rows,
        test_rows: trained.test_rows,
        coefficients: trained.model.weights,
        intercept: trained.model.bias,
        correlation: correlation_matrix(dataset),
        holdout: Holdout {
            actual: trained.test_actuals.clone(),
            predicted: trained.test_predictions.clone(),
        },
    }))
}

/// Run one what-if scenario
async fn api_simulate(
    State(state): State<Arc<AppState>>,
    Json(features): Json<Features>,
) -> Result<Json<Simulation>, ApiError> {
    state.run_simulation(features).map(Json).map_err(|e| {
        if !matches!(e, AgroError::InvalidScenarioInput { .. }) {
            warn!(kind = e.kind(), error = %e, "Simulation unavailable");
        }
        ApiError(e)
    })
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still serving views
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/api/v1/data", get(api_data))
        .route("/api/v1/metrics", get(api_metrics))
        .route("/api/v1/simulate", post(api_simulate))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the HTTP server and run until `shutdown` resolves
pub async fn serve(
    addr: String,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
