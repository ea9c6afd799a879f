//! Block lookup handlers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::BlocksQuery;
use crate::app_state::AppState;
use crate::domain::Block;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /blocks` — Latest blocks, newest first.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] on a malformed `limit` and
/// [`GatewayError::PersistenceError`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/blocks",
    tag = "Blocks",
    summary = "List latest blocks",
    description = "Returns the most recent blocks ordered by timestamp, newest first.",
    params(BlocksQuery),
    responses(
        (status = 200, description = "Latest blocks", body = Vec<Block>),
        (status = 400, description = "Invalid limit", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_blocks(
    State(state): State<AppState>,
    Query(query): Query<BlocksQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let limit = query.limit()?;
    let blocks = state.store.latest_blocks(limit).await?;
    Ok(Json(blocks))
}

/// `GET /blocks/{id}` — One block by id or hash.
///
/// # Errors
///
/// Returns [`GatewayError::BlockNotFound`] if nothing matches.
#[utoipa::path(
    get,
    path = "/api/blocks/{id}",
    tag = "Blocks",
    summary = "Get a block",
    description = "Looks a block up by its id or its hash and lists its transaction hashes.",
    params(
        ("id" = String, Path, description = "Block id or hash"),
    ),
    responses(
        (status = 200, description = "Block details", body = Block),
        (status = 404, description = "Block not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn get_block(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let block = state
        .store
        .block(&id)
        .await?
        .ok_or(GatewayError::BlockNotFound(id))?;
    Ok(Json(block))
}

/// Block routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blocks", get(list_blocks))
        .route("/blocks/{id}", get(get_block))
}
