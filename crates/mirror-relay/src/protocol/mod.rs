//! Wire-level constants shared with clients

mod close_codes;

pub use close_codes::CloseCode;
