//! Subscriber session: the lifecycle of one WebSocket connection.
//!
//! A session registers its mailbox, pushes an initial metrics snapshot,
//! then forwards mailbox events to the socket while draining whatever the
//! client sends, solely to notice disconnection. It is the only writer of
//! its socket. Whatever ends the loop, deregistration runs exactly once on
//! the way out.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, ConnectionRegistry, Event};
use crate::error::GatewayError;
use crate::persistence::LedgerStore;

/// Everything a session needs besides its socket.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Registry the session joins for its lifetime.
    pub registry: Arc<ConnectionRegistry>,
    /// Source of the initial metrics snapshot.
    pub store: Arc<dyn LedgerStore>,
    /// Mailbox capacity. A subscriber that falls this far behind is evicted.
    pub outbox_capacity: usize,
    /// Upper bound on one socket write.
    pub write_timeout: Duration,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The client sent a Close frame or the stream ended.
    ClientClosed,
    /// Reading from the socket failed.
    ReadFailed,
    /// Writing to the socket failed.
    WriteFailed,
    /// A write did not complete within the write timeout.
    WriteTimedOut,
    /// The hub dropped the mailbox (eviction or shutdown).
    MailboxClosed,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::ClientClosed => "client closed",
            Self::ReadFailed => "read failed",
            Self::WriteFailed => "write failed",
            Self::WriteTimedOut => "write timed out",
            Self::MailboxClosed => "mailbox closed",
        };
        f.write_str(reason)
    }
}

/// Runs one subscriber session to completion.
pub async fn run_session(mut socket: WebSocket, ctx: SessionContext) {
    let conn_id = ConnectionId::new();
    let (outbox, mailbox) = mpsc::channel::<Event>(ctx.outbox_capacity.max(1));

    // Register before reading the snapshot: anything published from here
    // on lands in the mailbox, so there is no gap after the snapshot.
    if let Err(err) = ctx.registry.add(conn_id, outbox).await {
        match err {
            GatewayError::RegistryClosed => {
                tracing::debug!(%conn_id, "shutting down, subscriber refused");
            }
            err => tracing::error!(%conn_id, error = %err, "subscriber registration failed"),
        }
        let _ = write_frame(&mut socket, Message::Close(None), ctx.write_timeout).await;
        return;
    }
    tracing::debug!(%conn_id, "subscriber registered");

    let reason = pump(conn_id, socket, mailbox, &ctx).await;

    if ctx.registry.remove(conn_id).await {
        tracing::debug!(%conn_id, %reason, "subscriber removed");
    } else {
        tracing::debug!(%conn_id, %reason, "subscriber already evicted");
    }
}

async fn pump(
    conn_id: ConnectionId,
    socket: WebSocket,
    mut mailbox: mpsc::Receiver<Event>,
    ctx: &SessionContext,
) -> CloseReason {
    let (mut ws_tx, mut ws_rx) = socket.split();

    match ctx.store.current_metrics().await {
        Ok(metrics) => match Event::from_json(&metrics) {
            Ok(snapshot) => {
                if let Err(reason) =
                    write_frame(&mut ws_tx, snapshot.into_message(), ctx.write_timeout).await
                {
                    return reason;
                }
            }
            Err(err) => tracing::error!(%conn_id, error = %err, "initial snapshot encoding failed"),
        },
        Err(err) => {
            tracing::warn!(%conn_id, error = %err, "initial snapshot unavailable");
        }
    }

    loop {
        tokio::select! {
            queued = mailbox.recv() => match queued {
                Some(event) => {
                    if let Err(reason) =
                        write_frame(&mut ws_tx, event.into_message(), ctx.write_timeout).await
                    {
                        return reason;
                    }
                }
                None => {
                    let _ = write_frame(&mut ws_tx, Message::Close(None), ctx.write_timeout).await;
                    return CloseReason::MailboxClosed;
                }
            },
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => return CloseReason::ClientClosed,
                Some(Err(err)) => {
                    tracing::debug!(%conn_id, error = %err, "ws read failed");
                    return CloseReason::ReadFailed;
                }
                // Client payloads carry no meaning; pings are answered by axum.
                Some(Ok(_)) => {}
            },
        }
    }
}

/// Sends one frame, giving up after `timeout`.
async fn write_frame<S>(
    ws_tx: &mut S,
    message: Message,
    timeout: Duration,
) -> Result<(), CloseReason>
where
    S: Sink<Message> + Unpin,
{
    match tokio::time::timeout(timeout, ws_tx.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(_)) => Err(CloseReason::WriteFailed),
        Err(_) => Err(CloseReason::WriteTimedOut),
    }
}
