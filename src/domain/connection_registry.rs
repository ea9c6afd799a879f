//! Concurrent set of live subscriber connections.
//!
//! [`ConnectionRegistry`] maps each [`ConnectionId`] to the sending half of
//! that subscriber's mailbox. It never holds a socket: the session owns the
//! write path, the registry only knows how to reach its mailbox. Dropping
//! the stored sender (on [`ConnectionRegistry::remove`] or
//! [`ConnectionRegistry::close`]) closes the mailbox, which is how the
//! session learns it has been evicted. Once closed, the registry accepts
//! no new members, so a session that upgrades during shutdown cannot end
//! up with a mailbox nobody will ever close.

use std::collections::HashMap;

use tokio::sync::{RwLock, mpsc};

use super::{ConnectionId, Event};
use crate::error::GatewayError;

/// Sending half of a subscriber's bounded mailbox.
pub type Outbox = mpsc::Sender<Event>;

/// Registry of active subscribers.
///
/// # Concurrency
///
/// - `add`, `remove` and `close` take the write lock briefly.
/// - [`ConnectionRegistry::snapshot`] copies the membership under the read
///   lock; callers iterate the copy without holding any lock.
/// - An `add` that returned is visible to every later snapshot.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    inner: RwLock<Members>,
}

#[derive(Debug, Default)]
struct Members {
    connections: HashMap<ConnectionId, Outbox>,
    closed: bool,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RegistryClosed`] after
    /// [`ConnectionRegistry::close`], or [`GatewayError::Internal`] if the
    /// ID is already registered (should never happen with UUID v4).
    pub async fn add(&self, id: ConnectionId, outbox: Outbox) -> Result<(), GatewayError> {
        let mut members = self.inner.write().await;
        if members.closed {
            return Err(GatewayError::RegistryClosed);
        }
        if members.connections.contains_key(&id) {
            return Err(GatewayError::Internal(format!(
                "connection {id} already registered"
            )));
        }
        members.connections.insert(id, outbox);
        Ok(())
    }

    /// Deregisters a subscriber. Returns `false` if it was already gone.
    pub async fn remove(&self, id: ConnectionId) -> bool {
        self.inner.write().await.connections.remove(&id).is_some()
    }

    /// Returns a copy of the current membership.
    pub async fn snapshot(&self) -> Vec<(ConnectionId, Outbox)> {
        self.inner
            .read()
            .await
            .connections
            .iter()
            .map(|(id, outbox)| (*id, outbox.clone()))
            .collect()
    }

    /// Returns `true` if the subscriber is registered.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.inner.read().await.connections.contains_key(&id)
    }

    /// Drops every mailbox and refuses further registrations. Returns how
    /// many subscribers were removed.
    pub async fn close(&self) -> usize {
        let mut members = self.inner.write().await;
        members.closed = true;
        let count = members.connections.len();
        members.connections.clear();
        count
    }

    /// Returns `true` once [`ConnectionRegistry::close`] has run.
    pub async fn is_closed(&self) -> bool {
        self.inner.read().await.closed
    }

    /// Returns the number of registered subscribers.
    pub async fn len(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Returns `true` if no subscriber is registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.connections.is_empty()
    }
}
