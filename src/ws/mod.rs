//! WebSocket layer: upgrade handling and subscriber sessions.
//!
//! The endpoint at `/ws` streams every event published on the
//! [`crate::domain::EventBus`] to the connected client, starting with a
//! snapshot of the current metrics. Client messages are read but ignored.

pub mod connection;
pub mod handler;
