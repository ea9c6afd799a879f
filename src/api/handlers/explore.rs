//! Metrics and search handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{SEARCH_RESULT_LIMIT, SearchQuery, SearchResponse};
use crate::app_state::AppState;
use crate::domain::MetricsSnapshot;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /metrics` — Current aggregate metrics.
///
/// Same payload the live feed pushes over `/ws`.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/metrics",
    tag = "Metrics",
    summary = "Current network metrics",
    responses(
        (status = 200, description = "Metrics snapshot", body = MetricsSnapshot),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn get_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    let metrics = state.store.current_metrics().await?;
    Ok(Json(metrics))
}

/// `GET /search?q=` — Free-text search over blocks and transactions.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when `q` is missing or blank.
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Search",
    summary = "Search blocks and transactions",
    description = "Case-insensitive substring match on block ids and hashes, and on transaction hashes and addresses. At most 10 hits of each kind.",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search hits", body = SearchResponse),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let needle = query.needle()?;
    let hits = state.store.search(needle, SEARCH_RESULT_LIMIT).await?;
    Ok(Json(SearchResponse {
        query: needle.to_string(),
        blocks: hits.blocks,
        transactions: hits.transactions,
    }))
}

/// Metrics and search routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/search", get(search))
}
