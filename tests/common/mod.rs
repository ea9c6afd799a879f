//! Shared fixtures: an in-memory ledger and a server bound to a random port.

#![allow(dead_code, missing_docs, missing_debug_implementations, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use blockdag_gateway::app_state::AppState;
use blockdag_gateway::config::GatewayConfig;
use blockdag_gateway::domain::{
    Block, ConnectionRegistry, EventBus, LedgerCounts, MetricsSnapshot, SearchHits, Transaction,
};
use blockdag_gateway::error::GatewayError;
use blockdag_gateway::persistence::LedgerStore;
use blockdag_gateway::server::build_app;
use blockdag_gateway::service::{BroadcastHub, HubStats};
use blockdag_gateway::shutdown::Shutdown;

pub type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// In-memory ledger with a switch to make every query fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub blocks: Vec<Block>,
    pub transactions: Vec<Transaction>,
    pub failing: AtomicBool,
    metrics_calls: AtomicU64,
}

impl MemoryStore {
    /// Three blocks and four transactions between `alice`, `bob` and `carol`.
    pub fn seeded() -> Self {
        let ts = |s: i64| Utc.timestamp_opt(1_700_000_000 + s, 0).single().unwrap_or_default();
        let block = |n: i64, tip: bool| Block {
            id: n.to_string(),
            hash: format!("0xb{n}"),
            parent_hash: format!("0xb{}", n - 1),
            timestamp: ts(n * 10),
            transactions: Vec::new(),
            confirmations: if tip { 0 } else { 3 - n },
            is_tip: tip,
            weight: n,
        };
        let tx = |n: i64, from: &str, to: &str, block: i64| Transaction {
            hash: format!("0xt{n}"),
            from: from.to_string(),
            to: to.to_string(),
            amount: n as f64,
            timestamp: ts(block * 10 + n),
            block_hash: format!("0xb{block}"),
            status: "confirmed".to_string(),
        };

        Self {
            blocks: vec![block(1, false), block(2, false), block(3, true)],
            transactions: vec![
                tx(1, "alice", "bob", 1),
                tx(2, "bob", "carol", 2),
                tx(3, "alice", "carol", 3),
                tx(4, "carol", "alice", 3),
            ],
            ..Self::default()
        }
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::PersistenceError(
                "connection refused".to_string(),
            ));
        }
        Ok(())
    }

    fn newest_first<T: Clone>(items: &[T], key: impl Fn(&T) -> i64) -> Vec<T> {
        let mut items = items.to_vec();
        items.sort_by_key(|item| std::cmp::Reverse(key(item)));
        items
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn latest_blocks(&self, limit: u32) -> Result<Vec<Block>, GatewayError> {
        self.check()?;
        let blocks = Self::newest_first(&self.blocks, |b| b.timestamp.timestamp());
        Ok(blocks.into_iter().take(limit as usize).collect())
    }

    async fn block(&self, id_or_hash: &str) -> Result<Option<Block>, GatewayError> {
        self.check()?;
        let Some(block) = self
            .blocks
            .iter()
            .find(|b| b.id == id_or_hash || b.hash == id_or_hash)
        else {
            return Ok(None);
        };
        let mut block = block.clone();
        block.transactions = self
            .transactions
            .iter()
            .filter(|tx| tx.block_hash == block.hash)
            .map(|tx| tx.hash.clone())
            .collect();
        Ok(Some(block))
    }

    async fn transaction(&self, hash: &str) -> Result<Option<Transaction>, GatewayError> {
        self.check()?;
        Ok(self.transactions.iter().find(|tx| tx.hash == hash).cloned())
    }

    async fn address_transactions(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<Transaction>, GatewayError> {
        self.check()?;
        let matching: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|tx| tx.from == address || tx.to == address)
            .cloned()
            .collect();
        Ok(Self::newest_first(&matching, |tx| tx.timestamp.timestamp())
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn search(&self, needle: &str, limit: u32) -> Result<SearchHits, GatewayError> {
        self.check()?;
        let needle = needle.to_lowercase();
        let hit = |s: &str| s.to_lowercase().contains(&needle);
        Ok(SearchHits {
            blocks: self
                .blocks
                .iter()
                .filter(|b| hit(&b.hash) || hit(&b.id))
                .take(limit as usize)
                .cloned()
                .collect(),
            transactions: self
                .transactions
                .iter()
                .filter(|tx| hit(&tx.hash) || hit(&tx.from) || hit(&tx.to))
                .take(limit as usize)
                .cloned()
                .collect(),
        })
    }

    async fn current_metrics(&self) -> Result<MetricsSnapshot, GatewayError> {
        self.check()?;
        let calls = self.metrics_calls.fetch_add(1, Ordering::SeqCst);
        let counts = LedgerCounts {
            transactions_last_minute: calls,
            tip_blocks: 1,
            total_blocks: self.blocks.len() as u64,
            total_transactions: self.transactions.len() as u64,
            unconfirmed_blocks: 1,
        };
        Ok(MetricsSnapshot::from_counts(counts, 2.5, Utc::now()))
    }
}

/// Running broadcast core plus the handles a test needs.
pub struct Harness {
    pub state: AppState,
    pub bus: EventBus,
    pub registry: Arc<ConnectionRegistry>,
    pub stats: Arc<HubStats>,
    pub shutdown: Shutdown,
}

/// Starts a hub over `store` without binding a socket.
pub fn harness(store: Arc<MemoryStore>, config: &GatewayConfig) -> Harness {
    let bus = EventBus::new(config.event_bus_capacity);
    let registry = Arc::new(ConnectionRegistry::new());
    let hub = BroadcastHub::new(&bus, Arc::clone(&registry));
    let stats = hub.stats();
    let shutdown = Shutdown::new();
    let _hub_task = hub.spawn(shutdown.signal());

    let store: Arc<dyn LedgerStore> = store;
    let state = AppState::new(
        store,
        bus.clone(),
        Arc::clone(&registry),
        Arc::clone(&stats),
        config,
    );
    Harness {
        state,
        bus,
        registry,
        stats,
        shutdown,
    }
}

/// A [`Harness`] whose router is served on `127.0.0.1:0`.
pub struct TestServer {
    pub addr: SocketAddr,
    pub harness: Harness,
}

impl TestServer {
    pub async fn start(store: Arc<MemoryStore>, config: GatewayConfig) -> Self {
        let harness = harness(store, &config);
        let app = build_app(harness.state.clone());
        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("cannot bind test listener");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("listener has no address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { addr, harness }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connect(&self) -> Client {
        let Ok((client, _)) = tokio_tungstenite::connect_async(self.ws_url()).await else {
            panic!("websocket handshake failed");
        };
        client
    }

    /// Waits until exactly `n` subscribers are registered.
    pub async fn wait_for_subscribers(&self, n: usize) {
        let registry = Arc::clone(&self.harness.registry);
        let waited = tokio::time::timeout(Duration::from_secs(2), async move {
            while registry.len().await != n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        if waited.is_err() {
            panic!("expected {n} subscribers");
        }
    }
}

/// Test configuration: permissive origins and roomy mailboxes.
pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        ws_outbox_capacity: 256,
        ws_write_timeout: Duration::from_secs(2),
        ..GatewayConfig::default()
    }
}

/// Reads the next text frame, skipping control frames.
pub async fn next_text(client: &mut Client) -> String {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), client.next()).await;
        match frame {
            Ok(Some(Ok(WsMessage::Text(text)))) => return text.as_str().to_string(),
            Ok(Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_)))) => {}
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

/// Asserts that no text frame arrives within a short grace period.
pub async fn assert_silent(client: &mut Client) {
    let frame = tokio::time::timeout(Duration::from_millis(150), client.next()).await;
    if let Ok(Some(Ok(WsMessage::Text(text)))) = frame {
        panic!("unexpected frame: {}", text.as_str());
    }
}
