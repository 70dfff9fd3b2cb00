//! WebSocket close codes
//!
//! Application close codes the relay sends when it ends a pairing connection.

use axum::extract::ws::CloseFrame;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Relay WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// The requested session id is not registered
    SessionNotFound = 4004,
}

impl CloseCode {
    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get a human-readable reason for this close code
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::SessionNotFound => "session not found",
        }
    }

    /// Build the close frame carrying this code
    #[must_use]
    pub fn frame(self) -> CloseFrame<'static> {
        CloseFrame {
            code: self.as_u16(),
            reason: Cow::Borrowed(self.reason()),
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_u16(), self.reason())
    }
}
