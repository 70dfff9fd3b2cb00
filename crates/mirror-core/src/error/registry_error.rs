//! Registry errors - failures creating a session

use thiserror::Error;

/// Session registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Every generated id collided with an existing session
    #[error("no free session id after {attempts} attempts")]
    IdSpaceExhausted { attempts: usize },

    /// The configured session limit has been reached
    #[error("session limit of {limit} reached")]
    CapacityReached { limit: usize },
}

impl RegistryError {
    /// Get error code for API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::IdSpaceExhausted { .. } => "ID_SPACE_EXHAUSTED",
            Self::CapacityReached { .. } => "CAPACITY_REACHED",
        }
    }
}
