//! Periodic metrics producer.
//!
//! Asks the [`LedgerStore`] for a fresh [`crate::domain::MetricsSnapshot`]
//! every interval and publishes it on the [`EventBus`]. Publishing never
//! blocks, so a slow or absent audience does not delay the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};

use crate::domain::EventBus;
use crate::persistence::LedgerStore;
use crate::shutdown::ShutdownSignal;

/// Publishes a metrics snapshot every `period` until shutdown.
///
/// Store failures are logged and the tick is skipped.
pub async fn run_metrics_producer(
    store: Arc<dyn LedgerStore>,
    bus: EventBus,
    period: Duration,
    mut shutdown: ShutdownSignal,
) {
    let mut ticker = interval(period);

    // Skip missed ticks to prevent backlog when the database is slow
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = shutdown.wait() => break,
            _ = ticker.tick() => {}
        }

        let metrics = match store.current_metrics().await {
            Ok(metrics) => metrics,
            Err(err) => {
                tracing::warn!(error = %err, "metrics snapshot failed");
                continue;
            }
        };

        match bus.publish_json(&metrics) {
            Ok(receivers) => tracing::trace!(receivers, "metrics published"),
            Err(err) => tracing::error!(error = %err, "metrics encoding failed"),
        }
    }

    tracing::info!("metrics producer stopped");
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::domain::{Block, LedgerCounts, MetricsSnapshot, SearchHits, Transaction};
    use crate::error::GatewayError;
    use crate::shutdown::Shutdown;

    /// Fails every other call.
    #[derive(Debug, Default)]
    struct FlakyStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LedgerStore for FlakyStore {
        async fn latest_blocks(&self, _limit: u32) -> Result<Vec<Block>, GatewayError> {
            Ok(Vec::new())
        }

        async fn block(&self, _id_or_hash: &str) -> Result<Option<Block>, GatewayError> {
            Ok(None)
        }

        async fn transaction(&self, _hash: &str) -> Result<Option<Transaction>, GatewayError> {
            Ok(None)
        }

        async fn address_transactions(
            &self,
            _address: &str,
            _limit: u32,
        ) -> Result<Vec<Transaction>, GatewayError> {
            Ok(Vec::new())
        }

        async fn search(&self, _needle: &str, _limit: u32) -> Result<SearchHits, GatewayError> {
            Ok(SearchHits::default())
        }

        async fn current_metrics(&self) -> Result<MetricsSnapshot, GatewayError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 1 {
                return Err(GatewayError::PersistenceError("flaky".to_string()));
            }
            let counts = LedgerCounts {
                total_blocks: call as u64,
                ..LedgerCounts::default()
            };
            Ok(MetricsSnapshot::from_counts(counts, 2.5, Utc::now()))
        }
    }

    #[tokio::test]
    async fn publishes_snapshots_and_skips_failures() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let shutdown = Shutdown::new();
        let task = tokio::spawn(run_metrics_producer(
            Arc::new(FlakyStore::default()),
            bus.clone(),
            Duration::from_millis(10),
            shutdown.signal(),
        ));

        for expected_blocks in [0_u64, 2] {
            let received = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
            let Ok(Ok(event)) = received else {
                panic!("expected a metrics event");
            };
            let Ok(metrics) = serde_json::from_str::<MetricsSnapshot>(event.as_str()) else {
                panic!("event is not a metrics snapshot");
            };
            assert_eq!(metrics.total_blocks, expected_blocks);
        }

        shutdown.trigger();
        assert!(task.await.is_ok());
    }
}
