//! Inbound channel between event producers and the broadcast hub.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel whose only
//! receiver is held by [`crate::service::BroadcastHub`]. Publishing never
//! waits: when the ring buffer is full the oldest pending event is
//! overwritten and the hub later observes how many were lost.

use serde::Serialize;
use tokio::sync::broadcast;

use super::Event;
use crate::error::GatewayError;

/// Producer-facing handle to the inbound event channel.
///
/// Cheap to clone; every producer keeps its own copy.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new `EventBus` for `capacity` pending events.
    ///
    /// The ring buffer only comes in powers of two, so `capacity` is
    /// rounded up: asking for 1000 buffers 1024. See
    /// [`EventBus::capacity`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = Self::effective_capacity(capacity);
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, capacity }
    }

    /// Number of events actually buffered for a requested `capacity`.
    #[must_use]
    pub const fn effective_capacity(requested: usize) -> usize {
        let requested = if requested == 0 { 1 } else { requested };
        requested.next_power_of_two()
    }

    /// Pending events held before the oldest is overwritten.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Publishes an event to the hub.
    ///
    /// Returns the number of receivers that will see the event: `1` while
    /// the hub runs, `0` otherwise (the event is then discarded).
    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Serializes `value` and publishes it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if `value` cannot be serialized.
    pub fn publish_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<usize, GatewayError> {
        Ok(self.publish(Event::from_json(value)?))
    }

    /// Creates the consuming end. Reserved for the hub.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
