//! OpenAPI document for the REST endpoints.

use utoipa::OpenApi;

use super::handlers::{blocks, explore, system, transactions};

/// Generated OpenAPI description, served at `/api-docs/openapi.json` when
/// the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "blockdag-gateway",
        description = "Read-only BlockDAG ledger queries. Live updates are streamed over `GET /ws`."
    ),
    paths(
        blocks::list_blocks,
        blocks::get_block,
        transactions::get_transaction,
        transactions::get_address,
        explore::get_metrics,
        explore::search,
        system::health_handler,
    ),
    tags(
        (name = "Blocks", description = "Block lookups"),
        (name = "Transactions", description = "Transaction and address lookups"),
        (name = "Metrics", description = "Aggregate network metrics"),
        (name = "Search", description = "Free-text search"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/blocks",
            "/api/blocks/{id}",
            "/api/transactions/{hash}",
            "/api/addresses/{address}",
            "/api/metrics",
            "/api/search",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
