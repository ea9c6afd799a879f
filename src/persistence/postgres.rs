//! PostgreSQL implementation of the ledger store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::LedgerStore;
use super::models::{
    BlockRow, CountsRow, TransactionRow, block_from_row, contains_pattern, counts_from_row,
    transaction_from_row,
};
use crate::config::GatewayConfig;
use crate::domain::{Block, MetricsSnapshot, SearchHits, Transaction};
use crate::error::GatewayError;

const BLOCK_COLUMNS: &str = "id::TEXT, hash, parent_hash, timestamp, \
     confirmations::INT8, is_tip, weight::INT8";

const TRANSACTION_COLUMNS: &str = "hash, from_address, to_address, amount::FLOAT8, \
     timestamp, block_hash, status";

/// PostgreSQL-backed ledger store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    confirmation_latency_secs: f64,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool, confirmation_latency_secs: f64) -> Self {
        Self {
            pool,
            confirmation_latency_secs,
        }
    }

    /// Opens a connection pool from the configuration and verifies the
    /// database answers.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database cannot
    /// be reached.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        let store = Self::new(pool, config.confirmation_latency_secs);
        store.ping().await?;
        tracing::info!("connected to ledger database");
        Ok(store)
    }

    /// Round-trips a trivial query.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn block_transaction_hashes(&self, block_hash: &str) -> Result<Vec<String>, GatewayError> {
        let hashes = sqlx::query_scalar::<_, String>(
            "SELECT hash FROM transactions WHERE block_hash = $1 ORDER BY timestamp ASC",
        )
        .bind(block_hash)
        .fetch_all(&self.pool)
        .await?;
        Ok(hashes)
    }
}

#[async_trait]
impl LedgerStore for PostgresStore {
    async fn latest_blocks(&self, limit: u32) -> Result<Vec<Block>, GatewayError> {
        let rows = sqlx::query_as::<_, BlockRow>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM blocks ORDER BY timestamp DESC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(block_from_row).collect())
    }

    async fn block(&self, id_or_hash: &str) -> Result<Option<Block>, GatewayError> {
        let row = sqlx::query_as::<_, BlockRow>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM blocks WHERE id::TEXT = $1 OR hash = $1 LIMIT 1"
        ))
        .bind(id_or_hash)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut block = block_from_row(row);
        block.transactions = self.block_transaction_hashes(&block.hash).await?;
        Ok(Some(block))
    }

    async fn transaction(&self, hash: &str) -> Result<Option<Transaction>, GatewayError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE hash = $1"
        ))
        .bind(hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(transaction_from_row))
    }

    async fn address_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<Transaction>, GatewayError> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             WHERE from_address = $1 OR to_address = $1 \
             ORDER BY timestamp DESC LIMIT $2"
        ))
        .bind(address)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(transaction_from_row).collect())
    }

    async fn search(&self, needle: &str, limit: u32) -> Result<SearchHits, GatewayError> {
        let pattern = contains_pattern(needle);

        let blocks = sqlx::query_as::<_, BlockRow>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM blocks \
             WHERE hash ILIKE $1 OR id::TEXT ILIKE $1 LIMIT $2"
        ))
        .bind(&pattern)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let transactions = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             WHERE hash ILIKE $1 OR from_address ILIKE $1 OR to_address ILIKE $1 LIMIT $2"
        ))
        .bind(&pattern)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(SearchHits {
            blocks: blocks.into_iter().map(block_from_row).collect(),
            transactions: transactions.into_iter().map(transaction_from_row).collect(),
        })
    }

    async fn current_metrics(&self) -> Result<MetricsSnapshot, GatewayError> {
        // One statement so every count comes from the same snapshot.
        let row = sqlx::query_as::<_, CountsRow>(
            "SELECT \
               (SELECT COUNT(*) FROM transactions WHERE timestamp > NOW() - INTERVAL '1 minute'), \
               (SELECT COUNT(*) FROM blocks WHERE is_tip = true), \
               (SELECT COUNT(*) FROM blocks), \
               (SELECT COUNT(*) FROM transactions), \
               (SELECT COUNT(*) FROM blocks WHERE confirmations = 0)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(MetricsSnapshot::from_counts(
            counts_from_row(row),
            self.confirmation_latency_secs,
            Utc::now(),
        ))
    }
}
