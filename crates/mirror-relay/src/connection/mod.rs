//! Live connection handles
//!
//! A handle is what a session slot stores: the connection's identity plus the
//! queue feeding its socket writer.

mod handle;

pub use handle::{ConnectionHandle, ConnectionId};
