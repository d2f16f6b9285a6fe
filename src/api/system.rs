//! System endpoints: health check and hub status.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Hub status response.
#[derive(Debug, Serialize, ToSchema)]
struct StatusResponse {
    /// Whether the gateway currently holds a live feed connection.
    connected: bool,
    /// Number of connected WebSocket clients.
    client_count: usize,
}

/// `GET /status` — Aggregate hub status.
#[utoipa::path(
    get,
    path = "/status",
    tag = "System",
    summary = "Hub status",
    description = "Returns feed connectivity and the number of connected clients.",
    responses(
        (status = 200, description = "Current hub status", body = StatusResponse),
    )
)]
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.hub.status().await;
    (
        StatusCode::OK,
        Json(StatusResponse {
            connected: status.connected,
            client_count: status.client_count,
        }),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
}
