//! Peer role within a session

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which slot of a session a connection occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sender,
    #[default]
    Receiver,
}

impl Role {
    /// Resolve the `role` query parameter.
    ///
    /// Only an exact `"sender"` selects the sender slot; anything else,
    /// including a missing parameter, is a receiver.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("sender") => Self::Sender,
            _ => Self::Receiver,
        }
    }

    /// The role messages from `self` are delivered to
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Sender => Self::Receiver,
            Self::Receiver => Self::Sender,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sender => "sender",
            Self::Receiver => "receiver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
