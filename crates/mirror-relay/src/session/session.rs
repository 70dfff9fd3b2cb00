//! Session pairing state
//!
//! One sender slot and one receiver slot behind a single lock. The lock is a
//! synchronous mutex and none of the critical sections await, so it is never
//! held across socket I/O or while waiting on a peer's outbound queue.

use crate::connection::ConnectionHandle;
use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use mirror_core::{Role, SessionId};
use parking_lot::Mutex;

/// Result of a single forward attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Queued on the opposite peer's writer
    Delivered,
    /// Opposite slot is empty; the message was dropped
    NoPeer,
    /// Opposite peer is bound but its writer has gone away; the message was dropped
    WriteFailed,
}

#[derive(Default)]
struct Slots {
    sender: Option<ConnectionHandle>,
    receiver: Option<ConnectionHandle>,
}

impl Slots {
    fn get(&self, role: Role) -> Option<&ConnectionHandle> {
        match role {
            Role::Sender => self.sender.as_ref(),
            Role::Receiver => self.receiver.as_ref(),
        }
    }

    fn get_mut(&mut self, role: Role) -> &mut Option<ConnectionHandle> {
        match role {
            Role::Sender => &mut self.sender,
            Role::Receiver => &mut self.receiver,
        }
    }
}

/// Pairing context shared by a sender and a receiver
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    slots: Mutex<Slots>,
}

impl Session {
    /// Create an empty session
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            slots: Mutex::new(Slots::default()),
        }
    }

    /// Get the session ID
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// How long ago the session was created
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }

    /// Bind a connection to a role, replacing any previous occupant.
    ///
    /// Returns the displaced handle, if there was one.
    pub fn bind(&self, role: Role, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let connection_id = handle.id();
        let displaced = self.slots.lock().get_mut(role).replace(handle);

        match &displaced {
            Some(old) => tracing::info!(
                session_id = %self.id,
                role = %role,
                connection_id = %connection_id,
                displaced_connection_id = %old.id(),
                "Role rebound, previous connection superseded"
            ),
            None => tracing::debug!(
                session_id = %self.id,
                role = %role,
                connection_id = %connection_id,
                "Role bound"
            ),
        }

        displaced
    }

    /// Clear a role's slot if `handle` still occupies it.
    ///
    /// Returns false when the slot is empty or has been rebound to another
    /// connection, in which case it is left untouched.
    pub fn unbind(&self, role: Role, handle: &ConnectionHandle) -> bool {
        let mut slots = self.slots.lock();
        let slot = slots.get_mut(role);

        if slot.as_ref() == Some(handle) {
            *slot = None;
            drop(slots);
            tracing::debug!(
                session_id = %self.id,
                role = %role,
                connection_id = %handle.id(),
                "Role unbound"
            );
            true
        } else {
            drop(slots);
            tracing::debug!(
                session_id = %self.id,
                role = %role,
                connection_id = %handle.id(),
                "Slot no longer held by this connection, leaving it"
            );
            false
        }
    }

    /// Forward a message from `from` to the opposite role.
    ///
    /// The target handle is cloned under the lock and the lock is released
    /// before waiting on the target's queue, so a slow peer holds back only
    /// the connection forwarding to it. Failures are logged and reported in
    /// the outcome, never propagated, and never clear the target slot.
    pub async fn forward(&self, from: Role, message: Message) -> ForwardOutcome {
        let target = self.slots.lock().get(from.opposite()).cloned();

        let Some(target) = target else {
            tracing::trace!(
                session_id = %self.id,
                from = %from,
                "No peer bound, dropping message"
            );
            return ForwardOutcome::NoPeer;
        };

        match target.deliver(message).await {
            Ok(()) => ForwardOutcome::Delivered,
            Err(_) => {
                tracing::warn!(
                    session_id = %self.id,
                    from = %from,
                    connection_id = %target.id(),
                    "Failed to forward message, peer writer closed"
                );
                ForwardOutcome::WriteFailed
            }
        }
    }

    /// Check whether a role currently has an occupant
    pub fn is_bound(&self, role: Role) -> bool {
        self.slots.lock().get(role).is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.lock();
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("sender", &slots.sender.as_ref().map(ConnectionHandle::id))
            .field("receiver", &slots.receiver.as_ref().map(ConnectionHandle::id))
            .finish()
    }
}
