//! REST endpoint handlers organized by resource.

pub mod blocks;
pub mod explore;
pub mod system;
pub mod transactions;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(blocks::routes())
        .merge(transactions::routes())
        .merge(explore::routes())
}
