//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::http::{HeaderMap, header};
use axum::response::Response;

use super::connection::run_session;
use crate::app_state::AppState;
use crate::error::GatewayError;

/// `GET /ws` — Upgrade HTTP connection to a live subscriber feed.
///
/// # Errors
///
/// Returns [`GatewayError::OriginNotAllowed`] if the `Origin` header is not
/// accepted by the configured policy. Requests without an `Origin` header
/// (non-browser clients) are accepted.
pub async fn ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, GatewayError> {
    if let Some(origin) = headers.get(header::ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !state.origin_policy.allows(origin) {
            tracing::warn!(origin, "ws upgrade rejected");
            return Err(GatewayError::OriginNotAllowed(origin.to_string()));
        }
    }

    let ctx = state.session_context();
    Ok(ws.on_upgrade(move |socket| run_session(socket, ctx)))
}
