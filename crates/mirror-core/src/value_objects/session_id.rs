//! Session ID - short alphanumeric token shared by a sender and a receiver
//!
//! Six characters drawn from `0-9A-Za-z`, giving 62^6 (~5.7e10) possible ids.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Pairing token identifying one relay session
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Symbols a session id is drawn from
    pub const ALPHABET: &'static [u8] =
        b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

    /// Number of characters in a session id
    pub const LEN: usize = 6;

    /// Parse and validate a session id
    pub fn parse(s: &str) -> Result<Self, SessionIdParseError> {
        if s.len() != Self::LEN {
            return Err(SessionIdParseError::InvalidLength(s.len()));
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(SessionIdParseError::InvalidCharacter);
        }
        Ok(Self(s.to_owned()))
    }

    /// Build an id from raw alphabet indices, wrapping out-of-range values
    #[must_use]
    pub fn from_indices(indices: [usize; Self::LEN]) -> Self {
        Self(
            indices
                .iter()
                .map(|i| Self::ALPHABET[i % Self::ALPHABET.len()] as char)
                .collect(),
        )
    }

    /// Borrow the id as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Error when parsing a session id from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionIdParseError {
    #[error("session id must be 6 characters, got {0}")]
    InvalidLength(usize),

    #[error("session id must be alphanumeric")]
    InvalidCharacter,
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SessionId {
    type Err = SessionIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionId::parse(s)
    }
}

impl Serialize for SessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        SessionId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
