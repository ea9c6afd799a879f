//! Process-wide shutdown coordination.
//!
//! A [`Shutdown`] is created once in `main` and handed to every long-lived
//! task as a [`ShutdownSignal`]. Triggering it stops the broadcast hub and
//! the metrics producer; the hub in turn drops every subscriber mailbox so
//! the sessions close their sockets.

use std::sync::Arc;

use tokio::sync::watch;

/// Owner side of the shutdown signal.
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Creates an untriggered shutdown handle.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns a signal that resolves once [`Shutdown::trigger`] is called.
    #[must_use]
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.sender.subscribe(),
        }
    }

    /// Requests shutdown. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` once shutdown was requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of the shutdown signal.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Waits until shutdown is requested or the owning [`Shutdown`] is
    /// gone. Cancel-safe.
    pub async fn wait(&mut self) {
        while !*self.receiver.borrow_and_update() {
            if self.receiver.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn wait_for_os_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
