//! blockdag-gateway server entry point.
//!
//! Connects to the ledger database, starts the broadcast hub and the
//! metrics producer, and serves the REST and WebSocket endpoints until
//! Ctrl-C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use blockdag_gateway::app_state::AppState;
use blockdag_gateway::config::{GatewayConfig, LogFormat};
use blockdag_gateway::domain::{ConnectionRegistry, EventBus};
use blockdag_gateway::persistence::{LedgerStore, PostgresStore};
use blockdag_gateway::server::build_app;
use blockdag_gateway::service::{BroadcastHub, run_metrics_producer};
use blockdag_gateway::shutdown::{Shutdown, wait_for_os_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config =
        GatewayConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting blockdag-gateway");

    // Persistence: no partial-service mode without the database
    let store: Arc<dyn LedgerStore> = Arc::new(
        PostgresStore::connect(&config)
            .await
            .context("cannot reach the ledger database")?,
    );

    // Broadcast core
    let shutdown = Shutdown::new();
    let event_bus = EventBus::new(config.event_bus_capacity);
    let registry = Arc::new(ConnectionRegistry::new());
    let hub = BroadcastHub::new(&event_bus, Arc::clone(&registry));
    let hub_stats = hub.stats();
    let hub_task = hub.spawn(shutdown.signal());

    // Producers
    let producer_task = tokio::spawn(run_metrics_producer(
        Arc::clone(&store),
        event_bus.clone(),
        Duration::from_secs(config.metrics_interval_secs),
        shutdown.signal(),
    ));

    // Build application state and router
    let app_state = AppState::new(store, event_bus, registry, hub_stats, &config);
    let app = build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    let trigger = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_os_signal().await;
            tracing::info!("shutdown requested");
            trigger.trigger();
        })
        .await
        .context("server error")?;

    // Make sure both background tasks observed the signal
    shutdown.trigger();
    let (hub_result, producer_result) = tokio::join!(hub_task, producer_task);
    if let Err(err) = hub_result {
        tracing::error!(error = %err, "broadcast hub task failed");
    }
    if let Err(err) = producer_result {
        tracing::error!(error = %err, "metrics producer task failed");
    }

    tracing::info!("blockdag-gateway stopped");
    Ok(())
}
