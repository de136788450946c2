//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use moodring_core::types::ConnectionId;

use crate::message::ServerEvent;

/// A handle to a single WebSocket connection.
///
/// Holds the sender half of the connection's outbound queue; the socket
/// task drains the receiver half and writes frames to the wire.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Sender for outbound events.
    pub sender: mpsc::Sender<ServerEvent>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a handle with a fresh outbound queue of the given capacity.
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let handle = Self {
            id: ConnectionId::new(),
            sender: tx,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        };
        (handle, rx)
    }

    /// Queue an event for this connection, fire-and-forget.
    ///
    /// A full buffer drops the event; a closed receiver marks the
    /// connection dead. Neither is an error for the caller.
    pub fn send(&self, event: ServerEvent) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(event) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Connection send buffer full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if the connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_delivers_to_receiver() {
        let (handle, mut rx) = ConnectionHandle::new(4);
        assert!(handle.send(ServerEvent::PollCleared {}));
        assert!(matches!(rx.try_recv(), Ok(ServerEvent::PollCleared {})));
    }

    #[tokio::test]
    async fn test_send_to_closed_receiver_marks_dead() {
        let (handle, rx) = ConnectionHandle::new(4);
        drop(rx);
        assert!(!handle.send(ServerEvent::PollCleared {}));
        assert!(!handle.is_alive());
        assert!(!handle.send(ServerEvent::PollCleared {}));
    }

    #[tokio::test]
    async fn test_full_buffer_drops_event() {
        let (handle, _rx) = ConnectionHandle::new(1);
        assert!(handle.send(ServerEvent::PollCleared {}));
        assert!(!handle.send(ServerEvent::PollCleared {}));
        assert!(handle.is_alive());
    }
}
