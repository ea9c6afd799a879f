//! The broadcast hub: single dispatcher fanning events out to subscribers.
//!
//! The hub owns the only receiver of the [`EventBus`]. For every event it
//! takes a snapshot of the [`ConnectionRegistry`] and offers the event to
//! each subscriber's bounded mailbox with `try_send`. It never waits on a
//! subscriber: a full mailbox means the subscriber cannot keep up, a closed
//! one means the session is gone, and both lead to eviction.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use crate::domain::{ConnectionRegistry, Event, EventBus};
use crate::shutdown::ShutdownSignal;

/// Counters maintained by the hub. Shared with the HTTP layer.
#[derive(Debug, Default)]
pub struct HubStats {
    events_dispatched: AtomicU64,
    deliveries: AtomicU64,
    evictions: AtomicU64,
    events_dropped: AtomicU64,
}

impl HubStats {
    /// Returns a point-in-time copy of the counters.
    #[must_use]
    pub fn snapshot(&self, subscribers: usize) -> HubStatsSnapshot {
        HubStatsSnapshot {
            subscribers,
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
        }
    }

    /// Events lost because the bus overflowed before the hub read them.
    #[must_use]
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    /// Subscribers removed by the hub.
    #[must_use]
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

/// Serializable view of [`HubStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HubStatsSnapshot {
    /// Currently registered subscribers.
    pub subscribers: usize,
    /// Events taken off the bus and fanned out.
    pub events_dispatched: u64,
    /// Successful mailbox deliveries across all subscribers.
    pub deliveries: u64,
    /// Subscribers evicted for being too slow or already gone.
    pub evictions: u64,
    /// Events overwritten on the bus before dispatch (drop-oldest).
    pub events_dropped: u64,
}

/// Result of fanning out a single event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Mailboxes that accepted the event.
    pub delivered: usize,
    /// Subscribers evicted during this round.
    pub evicted: usize,
}

/// Fan-out half of the hub: the registry plus counters.
#[derive(Debug)]
struct Fanout {
    registry: Arc<ConnectionRegistry>,
    stats: Arc<HubStats>,
}

impl Fanout {
    async fn dispatch(&self, event: &Event) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (conn_id, outbox) in self.registry.snapshot().await {
            match outbox.try_send(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    if self.registry.remove(conn_id).await {
                        tracing::warn!(%conn_id, "subscriber mailbox full, evicting");
                        report.evicted += 1;
                    }
                }
                Err(TrySendError::Closed(_)) => {
                    if self.registry.remove(conn_id).await {
                        tracing::debug!(%conn_id, "subscriber gone, evicting");
                        report.evicted += 1;
                    }
                }
            }
        }

        self.stats.events_dispatched.fetch_add(1, Ordering::Relaxed);
        self.stats
            .deliveries
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.stats
            .evictions
            .fetch_add(report.evicted as u64, Ordering::Relaxed);
        report
    }
}

/// Single logical dispatcher between the [`EventBus`] and the subscribers.
#[derive(Debug)]
pub struct BroadcastHub {
    fanout: Fanout,
    receiver: broadcast::Receiver<Event>,
}

impl BroadcastHub {
    /// Creates a hub consuming `bus` and delivering to `registry`.
    ///
    /// Events published before this call are not seen by the hub.
    #[must_use]
    pub fn new(bus: &EventBus, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            fanout: Fanout {
                registry,
                stats: Arc::new(HubStats::default()),
            },
            receiver: bus.subscribe(),
        }
    }

    /// Returns a handle to the hub counters.
    #[must_use]
    pub fn stats(&self) -> Arc<HubStats> {
        Arc::clone(&self.fanout.stats)
    }

    /// Fans out one event to the current membership.
    pub async fn dispatch(&self, event: &Event) -> DispatchReport {
        self.fanout.dispatch(event).await
    }

    /// Runs the dispatch loop until shutdown or until every bus sender is
    /// dropped, then closes the registry and with it every subscriber
    /// mailbox.
    pub async fn run(self, mut shutdown: ShutdownSignal) {
        let Self {
            fanout,
            mut receiver,
        } = self;
        tracing::info!("broadcast hub started");

        loop {
            tokio::select! {
                () = shutdown.wait() => break,
                received = receiver.recv() => match received {
                    Ok(event) => {
                        fanout.dispatch(&event).await;
                    }
                    Err(RecvError::Lagged(dropped)) => {
                        fanout.stats.events_dropped.fetch_add(dropped, Ordering::Relaxed);
                        tracing::warn!(dropped, "event bus overflowed, oldest events dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        let closed = fanout.registry.close().await;
        tracing::info!(closed, "broadcast hub stopped");
    }

    /// Spawns [`BroadcastHub::run`] on the current runtime.
    #[must_use]
    pub fn spawn(self, shutdown: ShutdownSignal) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
