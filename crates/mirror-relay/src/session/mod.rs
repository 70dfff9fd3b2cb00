//! Session pairing state and the registry that owns it

mod registry;
mod session;

pub use registry::{SessionRegistry, MAX_ID_ATTEMPTS};
pub use session::{ForwardOutcome, Session};
