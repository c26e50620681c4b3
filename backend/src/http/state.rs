//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::repository::PropertyRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn PropertyRepository>,
    /// Configuration the server was started with
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and default configuration.
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self::with_config(repository, ServerConfig::default())
    }

    /// Create a new application state with an explicit configuration.
    pub fn with_config(repository: Arc<dyn PropertyRepository>, config: ServerConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
