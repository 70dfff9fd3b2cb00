//! # mirror-relay
//!
//! WebSocket relay that pairs a sender and a receiver under a short session
//! id and forwards their messages to each other verbatim.

pub mod connection;
pub mod protocol;
pub mod server;
pub mod session;

pub use server::{create_app, create_relay_state, run, run_server, RelayState};
