//! Composite responses for the address and search endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Block, Transaction};

/// Maximum number of transactions returned for an address.
pub const ADDRESS_TRANSACTION_LIMIT: u32 = 20;

/// Maximum number of hits of each kind returned by a search.
pub const SEARCH_RESULT_LIMIT: u32 = 10;

/// Response body for `GET /api/addresses/{address}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    /// Address echoed from the path.
    pub address: String,
    /// Most recent transactions involving the address, newest first.
    pub transactions: Vec<Transaction>,
}

/// Response body for `GET /api/search`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    /// Search text echoed from the request.
    pub query: String,
    /// Matching blocks.
    pub blocks: Vec<Block>,
    /// Matching transactions.
    pub transactions: Vec<Transaction>,
}
