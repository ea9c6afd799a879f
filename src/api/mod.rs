//! REST API layer: route handlers, DTOs, router composition, and the
//! OpenAPI document.
//!
//! Ledger endpoints are mounted under `/api`; `/health` sits at the root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;

use crate::app_state::AppState;

/// Upper bound on a single query request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
}
