//! Relay state
//!
//! Application state shared by every connection handler.

use crate::session::SessionRegistry;
use mirror_common::AppConfig;
use std::sync::Arc;

/// Relay application state
///
/// Cheap to clone; every handler gets the same registry.
#[derive(Clone)]
pub struct RelayState {
    /// Session registry
    registry: Arc<SessionRegistry>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl RelayState {
    /// Create a new relay state
    pub fn new(registry: Arc<SessionRegistry>, config: AppConfig) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    /// Get the session registry
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for RelayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayState")
            .field("registry", &self.registry)
            .field("config", &"AppConfig")
            .finish()
    }
}
