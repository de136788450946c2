//! Connection pool — all active connections indexed by connection ID.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use moodring_core::types::ConnectionId;

use super::handle::ConnectionHandle;
use crate::message::ServerEvent;

/// Thread-safe pool of all active WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self {
            by_id: DashMap::new(),
        }
    }

    /// Registers a new connection.
    ///
    /// Returns the handle and the receiver half of its outbound queue.
    pub fn register(&self, buffer_size: usize) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerEvent>) {
        let (handle, rx) = ConnectionHandle::new(buffer_size);
        let handle = Arc::new(handle);
        self.by_id.insert(handle.id, handle.clone());
        (handle, rx)
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, conn_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.remove(&conn_id).map(|(_, handle)| {
            handle.mark_dead();
            handle
        })
    }

    /// Gets a connection by ID.
    pub fn get(&self, conn_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(&conn_id).map(|entry| entry.value().clone())
    }

    /// Returns the total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_remove() {
        let pool = ConnectionPool::new();
        let (handle, _rx) = pool.register(4);
        assert_eq!(pool.connection_count(), 1);
        assert!(pool.get(handle.id).is_some());

        let removed = pool.remove(handle.id).unwrap();
        assert!(!removed.is_alive());
        assert_eq!(pool.connection_count(), 0);
        assert!(pool.remove(handle.id).is_none());
    }
}
