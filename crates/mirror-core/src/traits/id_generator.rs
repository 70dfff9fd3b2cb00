//! Session id generation port
//!
//! The registry asks a generator for candidate ids and owns collision
//! handling; generators only need to be uniformly random.

use crate::value_objects::SessionId;
use rand::Rng;

/// Source of candidate session ids
pub trait SessionIdGenerator: Send + Sync {
    /// Produce the next candidate id
    fn generate(&self) -> SessionId;
}

/// Uniform random ids from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl SessionIdGenerator for RandomIdGenerator {
    fn generate(&self) -> SessionId {
        let mut rng = rand::thread_rng();
        let mut indices = [0usize; SessionId::LEN];
        for slot in &mut indices {
            *slot = rng.gen_range(0..SessionId::ALPHABET.len());
        }
        SessionId::from_indices(indices)
    }
}

impl<F> SessionIdGenerator for F
where
    F: Fn() -> SessionId + Send + Sync,
{
    fn generate(&self) -> SessionId {
        self()
    }
}
