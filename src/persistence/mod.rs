//! Persistence layer: read-only access to the ledger database.
//!
//! Provides the [`LedgerStore`] trait consumed by the HTTP handlers, the
//! WebSocket sessions, and the metrics producer. The concrete
//! implementation, [`PostgresStore`], uses `sqlx::PgPool` for async
//! PostgreSQL access. The schema is owned by the external ingester.

pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

pub use postgres::PostgresStore;

use crate::domain::{Block, MetricsSnapshot, SearchHits, Transaction};
use crate::error::GatewayError;

/// Read-only lookups against the ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync + fmt::Debug {
    /// Returns up to `limit` blocks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    async fn latest_blocks(&self, limit: u32) -> Result<Vec<Block>, GatewayError>;

    /// Looks up one block by id or hash, including its transaction hashes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    async fn block(&self, id_or_hash: &str) -> Result<Option<Block>, GatewayError>;

    /// Looks up one transaction by hash.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    async fn transaction(&self, hash: &str) -> Result<Option<Transaction>, GatewayError>;

    /// Returns up to `limit` transactions sent or received by `address`,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    async fn address_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<Transaction>, GatewayError>;

    /// Case-insensitive substring search over block ids/hashes and
    /// transaction hashes/addresses, at most `limit` hits of each kind.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    async fn search(&self, needle: &str, limit: u32) -> Result<SearchHits, GatewayError>;

    /// Computes the current aggregate metrics.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    async fn current_metrics(&self) -> Result<MetricsSnapshot, GatewayError>;
}
