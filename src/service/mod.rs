//! Service layer: the broadcast hub and the event producers feeding it.
//!
//! [`BroadcastHub`] drains the [`super::domain::EventBus`] and fans events
//! out to every registered subscriber; [`run_metrics_producer`] is the
//! periodic producer pushing metrics snapshots.

pub mod broadcast_hub;
pub mod metrics_producer;

pub use broadcast_hub::{BroadcastHub, DispatchReport, HubStats, HubStatsSnapshot};
pub use metrics_producer::run_metrics_producer;
