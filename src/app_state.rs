//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{GatewayConfig, OriginPolicy};
use crate::domain::{ConnectionRegistry, EventBus};
use crate::persistence::LedgerStore;
use crate::service::HubStats;
use crate::ws::connection::SessionContext;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Read-only ledger queries.
    pub store: Arc<dyn LedgerStore>,
    /// Producer handle for pushing events to subscribers.
    pub event_bus: EventBus,
    /// Live subscribers, shared with the broadcast hub.
    pub registry: Arc<ConnectionRegistry>,
    /// Hub counters for `/health`.
    pub hub_stats: Arc<HubStats>,
    /// Origin check for `/ws` and CORS.
    pub origin_policy: Arc<OriginPolicy>,
    /// Per-subscriber mailbox capacity.
    pub outbox_capacity: usize,
    /// Per-write socket timeout.
    pub write_timeout: Duration,
}

impl AppState {
    /// Assembles the state from its parts and the relevant config values.
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        event_bus: EventBus,
        registry: Arc<ConnectionRegistry>,
        hub_stats: Arc<HubStats>,
        config: &GatewayConfig,
    ) -> Self {
        Self {
            store,
            event_bus,
            registry,
            hub_stats,
            origin_policy: Arc::new(config.allowed_origins.clone()),
            outbox_capacity: config.ws_outbox_capacity,
            write_timeout: config.ws_write_timeout,
        }
    }

    /// Builds the context handed to a new subscriber session.
    #[must_use]
    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            registry: Arc::clone(&self.registry),
            store: Arc::clone(&self.store),
            outbox_capacity: self.outbox_capacity,
            write_timeout: self.write_timeout,
        }
    }
}
