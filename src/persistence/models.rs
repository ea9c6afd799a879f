//! Row shapes returned by the ledger queries and their domain conversions.

use chrono::{DateTime, Utc};

use crate::domain::{Block, LedgerCounts, Transaction};

/// `(id, hash, parent_hash, timestamp, confirmations, is_tip, weight)`
pub type BlockRow = (String, String, String, DateTime<Utc>, i64, bool, i64);

/// `(hash, from_address, to_address, amount, timestamp, block_hash, status)`
pub type TransactionRow = (String, String, String, f64, DateTime<Utc>, String, String);

/// `(tx_last_minute, tips, blocks, transactions, unconfirmed_blocks)`
pub type CountsRow = (i64, i64, i64, i64, i64);

/// Converts a block row. The transaction list starts empty.
#[must_use]
pub fn block_from_row(row: BlockRow) -> Block {
    let (id, hash, parent_hash, timestamp, confirmations, is_tip, weight) = row;
    Block {
        id,
        hash,
        parent_hash,
        timestamp,
        transactions: Vec::new(),
        confirmations,
        is_tip,
        weight,
    }
}

/// Converts a transaction row.
#[must_use]
pub fn transaction_from_row(row: TransactionRow) -> Transaction {
    let (hash, from, to, amount, timestamp, block_hash, status) = row;
    Transaction {
        hash,
        from,
        to,
        amount,
        timestamp,
        block_hash,
        status,
    }
}

/// Converts the aggregate counts row. Negative counts read as zero.
#[must_use]
pub fn counts_from_row(row: CountsRow) -> LedgerCounts {
    let (recent, tips, blocks, transactions, unconfirmed) = row;
    let count = |n: i64| u64::try_from(n).unwrap_or(0);
    LedgerCounts {
        transactions_last_minute: count(recent),
        tip_blocks: count(tips),
        total_blocks: count(blocks),
        total_transactions: count(transactions),
        unconfirmed_blocks: count(unconfirmed),
    }
}

/// Builds an `ILIKE` pattern matching `needle` anywhere, with `%`, `_`
/// and `\` in the needle matched literally.
#[must_use]
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
