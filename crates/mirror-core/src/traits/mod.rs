//! Ports the relay depends on

mod id_generator;

pub use id_generator::{RandomIdGenerator, SessionIdGenerator};
