//! Connection handle
//!
//! Identity plus outbound queue of one upgraded WebSocket connection.

use axum::extract::ws::Message;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate the next identifier
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a live connection's writer.
///
/// Two handles are equal only if they refer to the same connection, which is
/// what lets a disconnect clear a slot without clobbering a newer occupant.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbound: mpsc::Sender<Message>,
}

impl ConnectionHandle {
    /// Wrap the sending half of a connection's outbound queue
    pub fn new(outbound: mpsc::Sender<Message>) -> Self {
        Self {
            id: ConnectionId::next(),
            outbound,
        }
    }

    /// Get the connection ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a message for the writer, waiting while the queue is full.
    ///
    /// Fails only once the writer has gone away.
    pub async fn deliver(&self, message: Message) -> Result<(), mpsc::error::SendError<Message>> {
        self.outbound.send(message).await
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .field("closed", &self.outbound.is_closed())
            .finish()
    }
}
