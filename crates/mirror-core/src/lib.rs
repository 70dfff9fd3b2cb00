//! # mirror-core
//!
//! Domain layer containing the session id and role value objects, the id
//! generator port, and registry errors. This crate has no dependency on the
//! web framework or the runtime.

pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use error::RegistryError;
pub use traits::{RandomIdGenerator, SessionIdGenerator};
pub use value_objects::{Role, SessionId, SessionIdParseError};
