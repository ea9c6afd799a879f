//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "block not found: 0xabc",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server / Store  | 500 Internal Server Error |
/// | 4000–4999 | Access          | 403 Forbidden             |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No block matches the given id or hash.
    #[error("block not found: {0}")]
    BlockNotFound(String),

    /// No transaction matches the given hash.
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    /// The ledger store failed to answer a query.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// The WebSocket upgrade came from an origin outside the allow-list.
    #[error("origin not allowed: {0}")]
    OriginNotAllowed(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// The subscriber registry was closed for shutdown.
    #[error("subscriber registry is closed")]
    RegistryClosed,
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::BlockNotFound(_) => 2001,
            Self::TransactionNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::RegistryClosed => 3002,
            Self::OriginNotAllowed(_) => 4003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::BlockNotFound(_) | Self::TransactionNotFound(_) => StatusCode::NOT_FOUND,
            Self::PersistenceError(_) | Self::Internal(_) | Self::RegistryClosed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("serialization failed: {err}"))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        let block = GatewayError::BlockNotFound("b1".to_string());
        let tx = GatewayError::TransactionNotFound("t1".to_string());
        assert_eq!(block.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(tx.status_code(), StatusCode::NOT_FOUND);
        assert_ne!(block.error_code(), tx.error_code());
    }

    #[test]
    fn store_errors_are_server_errors() {
        let err = GatewayError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
        assert!(err.to_string().starts_with("persistence error"));
    }

    #[test]
    fn closed_registry_is_a_server_error() {
        let err = GatewayError::RegistryClosed;
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3002);
    }

    #[test]
    fn origin_rejection_is_forbidden() {
        let err = GatewayError::OriginNotAllowed("http://evil.test".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn into_response_carries_status() {
        let response = GatewayError::InvalidRequest("limit".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
