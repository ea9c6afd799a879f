//! Query parameter DTOs shared by the list and search endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::GatewayError;

/// Default number of blocks returned by `GET /api/blocks`.
pub const DEFAULT_BLOCK_LIMIT: u32 = 50;

/// Largest accepted `limit`.
pub const MAX_BLOCK_LIMIT: u32 = 500;

/// Query parameters for `GET /api/blocks`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlocksQuery {
    /// Number of blocks to return (1–500). Defaults to 50.
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
}

impl BlocksQuery {
    /// Parses and clamps `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `limit` is not a
    /// non-negative integer.
    pub fn limit(&self) -> Result<u32, GatewayError> {
        let Some(raw) = self.limit.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(DEFAULT_BLOCK_LIMIT);
        };
        let limit: u32 = raw
            .parse()
            .map_err(|_| GatewayError::InvalidRequest(format!("invalid limit: {raw}")))?;
        Ok(limit.clamp(1, MAX_BLOCK_LIMIT))
    }
}

/// Query parameters for `GET /api/search`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text to look for in block ids/hashes and transaction hashes/addresses.
    pub q: Option<String>,
}

impl SearchQuery {
    /// Returns the trimmed search text.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `q` is missing or blank.
    pub fn needle(&self) -> Result<&str, GatewayError> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| GatewayError::InvalidRequest("query parameter q is required".to_string()))
    }
}
