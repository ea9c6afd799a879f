//! Transaction and address lookup handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ADDRESS_TRANSACTION_LIMIT, AddressResponse};
use crate::app_state::AppState;
use crate::domain::Transaction;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /transactions/{hash}` — One transaction by hash.
///
/// # Errors
///
/// Returns [`GatewayError::TransactionNotFound`] if nothing matches.
#[utoipa::path(
    get,
    path = "/api/transactions/{hash}",
    tag = "Transactions",
    summary = "Get a transaction",
    params(
        ("hash" = String, Path, description = "Transaction hash"),
    ),
    responses(
        (status = 200, description = "Transaction details", body = Transaction),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let tx = state
        .store
        .transaction(&hash)
        .await?
        .ok_or(GatewayError::TransactionNotFound(hash))?;
    Ok(Json(tx))
}

/// `GET /addresses/{address}` — Recent activity of an address.
///
/// Unknown addresses yield an empty transaction list, not a 404.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/addresses/{address}",
    tag = "Transactions",
    summary = "Get address activity",
    description = "Returns the 20 most recent transactions sent or received by the address.",
    params(
        ("address" = String, Path, description = "Ledger address"),
    ),
    responses(
        (status = 200, description = "Address activity", body = AddressResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn get_address(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let transactions = state
        .store
        .address_transactions(&address, ADDRESS_TRANSACTION_LIMIT)
        .await?;
    Ok(Json(AddressResponse {
        address,
        transactions,
    }))
}

/// Transaction and address routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/{hash}", get(get_transaction))
        .route("/addresses/{address}", get(get_address))
}
