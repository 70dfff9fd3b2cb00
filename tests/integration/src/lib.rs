//! Integration test utilities for the relay
//!
//! This crate provides helpers for running end-to-end tests against a live
//! relay server over HTTP and WebSocket.

pub mod helpers;

pub use helpers::*;
