//! # blockdag-gateway
//!
//! Read-only REST API and live WebSocket feed over a BlockDAG ledger
//! (blocks, transactions, aggregate metrics) stored in PostgreSQL by an
//! external ingester.
//!
//! The heart of the crate is the broadcast hub: producers publish events
//! on a non-blocking [`domain::EventBus`], a single dispatcher fans each
//! event out to every subscriber's bounded mailbox, and each WebSocket
//! session drains its own mailbox. Slow or broken subscribers are evicted
//! without affecting the others.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)          ├── WS Sessions (ws/)
//!     │                                 │        ▲ per-connection mailbox
//!     │                                 │        │
//!     │                          BroadcastHub (service/)
//!     │                                 ▲
//!     │                          EventBus (domain/)
//!     │                                 ▲
//!     │                          Metrics producer (service/)
//!     │                                 │
//!     └────────── LedgerStore (persistence/) ── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod shutdown;
pub mod ws;
