//! Domain layer: ledger records, events, and the subscriber registry.
//!
//! This module contains the server-side domain model: identifiers for
//! live subscribers, the opaque [`Event`] frame, the inbound [`EventBus`],
//! the concurrent [`ConnectionRegistry`], and the ledger records returned
//! by the query API.

pub mod connection_id;
pub mod connection_registry;
pub mod event;
pub mod event_bus;
pub mod ledger;

pub use connection_id::ConnectionId;
pub use connection_registry::{ConnectionRegistry, Outbox};
pub use event::Event;
pub use event_bus::EventBus;
pub use ledger::{Block, LedgerCounts, MetricsSnapshot, SearchHits, Transaction};
