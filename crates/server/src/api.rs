//! HTTP API for the deployment list, health checks and Prometheus metrics

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dashboard_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    DashboardError, DataSelectQuery, DeploymentListService, NamespaceQuery, SelectionRequest,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::parse_namespaces;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: DeploymentListService,
    pub health_registry: HealthRegistry,
    /// Namespaces listed when the request path names none
    pub default_namespaces: NamespaceQuery,
}

impl AppState {
    pub fn new(
        service: DeploymentListService,
        health_registry: HealthRegistry,
        default_namespaces: NamespaceQuery,
    ) -> Self {
        Self {
            service,
            health_registry,
            default_namespaces,
        }
    }
}

/// Error body returned for failed list requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wraps core errors so they render as JSON with a matching status code
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

async fn list_deployments(
    state: &AppState,
    namespaces: NamespaceQuery,
    request: SelectionRequest,
) -> Result<Response, ApiError> {
    let query = DataSelectQuery::try_from(request)?;
    let list = state.service.list(&namespaces, &query).await?;
    Ok(Json(list).into_response())
}

/// Deployments in the configured default namespaces
async fn deployments(
    State(state): State<Arc<AppState>>,
    Query(request): Query<SelectionRequest>,
) -> Result<Response, ApiError> {
    let namespaces = state.default_namespaces.clone();
    list_deployments(&state, namespaces, request).await
}

/// Deployments in the comma separated namespaces of the path
async fn namespaced_deployments(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    Query(request): Query<SelectionRequest>,
) -> Result<Response, ApiError> {
    list_deployments(&state, parse_namespaces(&namespace), request).await
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still serving lists
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

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %err, "Failed to encode metrics");
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
        .route("/api/v1/deployment", get(deployments))
        .route("/api/v1/deployment/:namespace", get(namespaced_deployments))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let health_registry = state.health_registry.clone();
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    health_registry.record_success(components::HTTP_API).await;

    if let Err(err) = axum::serve(listener, app).await {
        health_registry
            .record_failure(components::HTTP_API, err.to_string())
            .await;
        return Err(err.into());
    }

    Ok(())
}
