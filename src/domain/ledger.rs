//! Ledger records served by the query API and pushed over the live feed.
//!
//! All types serialize with camelCase keys, which is the shape the explorer
//! frontend consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A block of the DAG as stored by the ingester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Ingester-assigned block identifier.
    pub id: String,
    /// Block hash.
    pub hash: String,
    /// Hash of the selected parent.
    pub parent_hash: String,
    /// Block timestamp.
    pub timestamp: DateTime<Utc>,
    /// Hashes of the transactions included in the block.
    ///
    /// Only populated on single-block lookups.
    pub transactions: Vec<String>,
    /// Number of confirmations.
    pub confirmations: i64,
    /// Whether the block currently has no known child.
    pub is_tip: bool,
    /// Accumulated weight.
    pub weight: i64,
}

/// A ledger transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction hash.
    pub hash: String,
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Transferred amount.
    pub amount: f64,
    /// Transaction timestamp.
    pub timestamp: DateTime<Utc>,
    /// Hash of the including block.
    pub block_hash: String,
    /// Status as reported by the ingester (e.g. `"confirmed"`).
    pub status: String,
}

/// Blocks and transactions matching a free-text search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchHits {
    /// Matching blocks.
    pub blocks: Vec<Block>,
    /// Matching transactions.
    pub transactions: Vec<Transaction>,
}

/// Raw aggregate counts the metrics are derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    /// Transactions with a timestamp in the last minute.
    pub transactions_last_minute: u64,
    /// Blocks flagged as tips.
    pub tip_blocks: u64,
    /// All blocks.
    pub total_blocks: u64,
    /// All transactions.
    pub total_transactions: u64,
    /// Blocks without any confirmation.
    pub unconfirmed_blocks: u64,
}

/// Aggregate network metrics, served by `GET /api/metrics` and pushed to
/// every live subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Transactions per second over the last minute.
    pub tps: f64,
    /// Confirmation latency in seconds.
    pub confirmation_latency: f64,
    /// Number of current tips.
    pub tip_pool_size: u64,
    /// Percentage of blocks without confirmations.
    pub orphan_rate: f64,
    /// Total number of blocks.
    pub total_blocks: u64,
    /// Total number of transactions.
    pub total_transactions: u64,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

impl MetricsSnapshot {
    /// Derives a snapshot from raw counts.
    ///
    /// `confirmation_latency` is supplied by the caller; the ledger does not
    /// record it.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(
        counts: LedgerCounts,
        confirmation_latency: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let orphan_rate = if counts.total_blocks == 0 {
            0.0
        } else {
            counts.unconfirmed_blocks as f64 / counts.total_blocks as f64 * 100.0
        };

        Self {
            tps: counts.transactions_last_minute as f64 / 60.0,
            confirmation_latency,
            tip_pool_size: counts.tip_blocks,
            orphan_rate,
            total_blocks: counts.total_blocks,
            total_transactions: counts.total_transactions,
            timestamp,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn metrics_from_counts() {
        let counts = LedgerCounts {
            transactions_last_minute: 120,
            tip_blocks: 3,
            total_blocks: 200,
            total_transactions: 5_000,
            unconfirmed_blocks: 5,
        };
        let snapshot = MetricsSnapshot::from_counts(counts, 2.5, Utc::now());
        assert!((snapshot.tps - 2.0).abs() < f64::EPSILON);
        assert!((snapshot.orphan_rate - 2.5).abs() < f64::EPSILON);
        assert_eq!(snapshot.tip_pool_size, 3);
        assert_eq!(snapshot.total_transactions, 5_000);
    }

    #[test]
    fn empty_ledger_has_zero_orphan_rate() {
        let snapshot = MetricsSnapshot::from_counts(LedgerCounts::default(), 2.5, Utc::now());
        assert!(snapshot.orphan_rate.abs() < f64::EPSILON);
        assert!(snapshot.tps.abs() < f64::EPSILON);
    }

    #[test]
    fn metrics_serialize_camel_case() {
        let snapshot = MetricsSnapshot::from_counts(LedgerCounts::default(), 2.5, Utc::now());
        let Ok(value) = serde_json::to_value(&snapshot) else {
            panic!("serialization failed");
        };
        for key in [
            "tps",
            "confirmationLatency",
            "tipPoolSize",
            "orphanRate",
            "totalBlocks",
            "totalTransactions",
            "timestamp",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn block_serializes_parent_hash_and_tip_flag() {
        let block = Block {
            id: "1".to_string(),
            hash: "0xabc".to_string(),
            parent_hash: "0xabb".to_string(),
            timestamp: Utc::now(),
            transactions: Vec::new(),
            confirmations: 4,
            is_tip: true,
            weight: 10,
        };
        let json = serde_json::to_string(&block).unwrap_or_default();
        assert!(json.contains("\"parentHash\":\"0xabb\""));
        assert!(json.contains("\"isTip\":true"));
    }
}
