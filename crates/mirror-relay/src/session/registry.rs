//! Session registry
//!
//! Maps session ids to sessions using `DashMap`. The map's shard locks are
//! independent of the per-session slot locks, so lookups never wait on a
//! forward in progress.
//!
//! Sessions are never removed. Growth is unbounded unless a session limit is
//! configured.

use super::Session;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mirror_core::{RandomIdGenerator, RegistryError, SessionId, SessionIdGenerator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fresh ids tried before `create` gives up on collisions
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Process-wide mapping from session id to session
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<Session>>,
    generator: Box<dyn SessionIdGenerator>,
    limit: Option<usize>,
    /// Admitted sessions, reserved before insertion so the limit is exact
    admitted: AtomicUsize,
}

impl SessionRegistry {
    /// Create an unbounded registry with random ids
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(RandomIdGenerator, None)
    }

    /// Create a registry with a custom id source and optional session limit
    pub fn with_generator(generator: impl SessionIdGenerator + 'static, limit: Option<usize>) -> Self {
        Self {
            sessions: DashMap::new(),
            generator: Box::new(generator),
            limit,
            admitted: AtomicUsize::new(0),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared(limit: Option<usize>) -> Arc<Self> {
        Arc::new(Self::with_generator(RandomIdGenerator, limit))
    }

    /// Create and register a new session.
    ///
    /// A generated id that is already taken is discarded and a fresh one is
    /// drawn, up to `MAX_ID_ATTEMPTS` times. Existing sessions are never
    /// overwritten.
    pub fn create(&self) -> Result<Arc<Session>, RegistryError> {
        self.admit()?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = self.generator.generate();
            match self.sessions.entry(id) {
                Entry::Occupied(entry) => {
                    tracing::debug!(
                        session_id = %entry.key(),
                        attempt,
                        "Session id collision, retrying"
                    );
                }
                Entry::Vacant(entry) => {
                    let session = Arc::new(Session::new(entry.key().clone()));
                    entry.insert(session.clone());

                    tracing::info!(session_id = %session.id(), "Session created");
                    return Ok(session);
                }
            }
        }

        self.admitted.fetch_sub(1, Ordering::SeqCst);
        tracing::error!(attempts = MAX_ID_ATTEMPTS, "Could not allocate a free session id");
        Err(RegistryError::IdSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    /// Reserve room for one more session
    fn admit(&self) -> Result<(), RegistryError> {
        match self.limit {
            None => {
                self.admitted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            Some(limit) => self
                .admitted
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                    (n < limit).then_some(n + 1)
                })
                .map(|_| ())
                .map_err(|_| {
                    tracing::warn!(limit, "Session limit reached");
                    RegistryError::CapacityReached { limit }
                }),
        }
    }

    /// Look up a session by id
    pub fn lookup(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|r| r.value().clone())
    }

    /// Look up a session by its raw query-string form.
    ///
    /// Strings that are not well-formed ids can never match.
    pub fn lookup_raw(&self, raw: &str) -> Option<Arc<Session>> {
        SessionId::parse(raw).ok().and_then(|id| self.lookup(&id))
    }

    /// Get the number of registered sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no session has been created
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The configured session limit
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("limit", &self.limit)
            .finish()
    }
}
