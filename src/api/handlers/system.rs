//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::service::HubStatsSnapshot;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    hub: HubStatsSnapshot,
}

/// `GET /health` — Service health status and broadcast hub counters.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp, and live-feed counters.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let subscribers = state.registry.len().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            hub: state.hub_stats.snapshot(subscribers),
        }),
    )
}

/// System routes mounted at the root level (not under /api).
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
