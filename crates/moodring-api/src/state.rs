//! Application state shared across all handlers.

use std::sync::Arc;

use moodring_core::config::AppConfig;
use moodring_engine::SessionStore;
use moodring_realtime::{ConnectionPool, Gateway};

/// Shared dependencies, passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The session registry.
    pub store: Arc<SessionStore>,
    /// All active WebSocket connections.
    pub connections: Arc<ConnectionPool>,
    /// The realtime event router.
    pub gateway: Arc<Gateway>,
}

impl AppState {
    /// Wires up the state from configuration.
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(SessionStore::new(config.session.clone()));
        let connections = Arc::new(ConnectionPool::new());
        let gateway = Gateway::new(
            store.clone(),
            connections.clone(),
            config.realtime.clone(),
            &config.session,
        );
        Self {
            config: Arc::new(config),
            store,
            connections,
            gateway,
        }
    }
}
