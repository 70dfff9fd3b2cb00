//! Value objects - immutable types that represent domain concepts

mod role;
mod session_id;

pub use role::Role;
pub use session_id::{SessionId, SessionIdParseError};
