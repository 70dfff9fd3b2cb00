//! Relay loop
//!
//! Runs once per upgraded pairing connection: look up the session, bind the
//! role, forward every message read from the socket to the opposite role,
//! and unbind when the socket ends.

use super::error::RelayError;
use super::RelayState;
use crate::connection::ConnectionHandle;
use crate::session::Session;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use mirror_core::Role;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long the writer gets to flush and close after the reader is done
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle an upgraded pairing connection
pub(crate) async fn run_relay(state: RelayState, socket: WebSocket, session_id: String, role: Role) {
    let (mut ws_sink, ws_stream) = socket.split();

    let Some(session) = state.registry().lookup_raw(&session_id) else {
        let err = RelayError::SessionNotFound(session_id);
        tracing::warn!(error = %err, role = %role, "Closing pairing connection");
        if let Some(code) = err.to_close_code() {
            let _ = ws_sink.send(Message::Close(Some(code.frame()))).await;
        }
        return;
    };

    // Outgoing messages for this connection
    let (tx, mut rx) = mpsc::channel::<Message>(state.config().relay.outbound_buffer);
    let handle = ConnectionHandle::new(tx);
    let connection_id = handle.id();

    // Spawn task to write forwarded messages to the WebSocket
    let session_id_send = session.id().clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = ws_sink.send(msg).await {
                tracing::warn!(
                    session_id = %session_id_send,
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to write to WebSocket"
                );
                break;
            }
        }

        // Close the WebSocket once no handle can reach this writer
        let _ = ws_sink.close().await;
    });

    session.bind(role, handle.clone());
    tracing::info!(
        session_id = %session.id(),
        role = %role,
        connection_id = %connection_id,
        "Peer connected"
    );

    read_loop(&session, role, &handle, ws_stream).await;

    session.unbind(role, &handle);
    drop(handle);

    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut send_task)
        .await
        .is_err()
    {
        tracing::debug!(connection_id = %connection_id, "Writer did not finish, aborting");
        send_task.abort();
    }

    tracing::info!(
        session_id = %session.id(),
        role = %role,
        connection_id = %connection_id,
        session_age_secs = session.age().num_seconds(),
        "Peer disconnected"
    );
}

/// Read messages until the peer goes away, forwarding each one in order
async fn read_loop(
    session: &Session,
    role: Role,
    handle: &ConnectionHandle,
    mut ws_stream: SplitStream<WebSocket>,
) {
    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(msg @ (Message::Text(_) | Message::Binary(_))) => {
                tracing::debug!(
                    session_id = %session.id(),
                    from = %role,
                    bytes = payload_len(&msg),
                    "Forwarding message"
                );
                // Waits while the peer's queue is full, holding back this reader
                session.forward(role, msg).await;
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Pong is handled automatically by axum
                tracing::trace!(connection_id = %handle.id(), "Control frame received");
            }
            Ok(Message::Close(frame)) => {
                tracing::debug!(
                    connection_id = %handle.id(),
                    code = frame.as_ref().map(|f| f.code),
                    "Client closed connection"
                );
                return;
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    connection_id = %handle.id(),
                    error = %e,
                    "WebSocket error"
                );
                return;
            }
        }
    }
}

fn payload_len(msg: &Message) -> usize {
    match msg {
        Message::Text(text) => text.len(),
        Message::Binary(data) | Message::Ping(data) | Message::Pong(data) => data.len(),
        Message::Close(_) => 0,
    }
}
