//! Broadcast rooms — one per live session, holding member connections.

use dashmap::DashMap;

use moodring_core::types::{ConnectionId, SessionCode};

/// Registry of broadcast rooms keyed by session code.
///
/// A room exists while it has members; withdrawing the last member
/// buries it.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<SessionCode, Vec<ConnectionId>>,
}

impl RoomRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Enrolls a connection in a session's room.
    pub fn enroll(&self, code: SessionCode, conn_id: ConnectionId) {
        let mut members = self.rooms.entry(code).or_default();
        if !members.contains(&conn_id) {
            members.push(conn_id);
        }
    }

    /// Withdraws a connection from a session's room.
    pub fn withdraw(&self, code: &SessionCode, conn_id: ConnectionId) {
        if let Some(mut members) = self.rooms.get_mut(code) {
            members.retain(|id| *id != conn_id);
            if members.is_empty() {
                drop(members);
                self.rooms.remove(code);
            }
        }
    }

    /// Returns the member connections of a session's room.
    pub fn members(&self, code: &SessionCode) -> Vec<ConnectionId> {
        self.rooms
            .get(code)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Deletes a room outright, returning its former members.
    pub fn remove_room(&self, code: &SessionCode) -> Vec<ConnectionId> {
        self.rooms
            .remove(code)
            .map(|(_, members)| members)
            .unwrap_or_default()
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> SessionCode {
        SessionCode::from_raw(raw).unwrap()
    }

    #[test]
    fn test_enroll_is_idempotent() {
        let rooms = RoomRegistry::new();
        let conn = ConnectionId::new();
        rooms.enroll(code("ABC123"), conn);
        rooms.enroll(code("ABC123"), conn);
        assert_eq!(rooms.members(&code("ABC123")), vec![conn]);
    }

    #[test]
    fn test_last_withdrawal_buries_the_room() {
        let rooms = RoomRegistry::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        rooms.enroll(code("ABC123"), a);
        rooms.enroll(code("ABC123"), b);

        rooms.withdraw(&code("ABC123"), a);
        assert_eq!(rooms.room_count(), 1);
        rooms.withdraw(&code("ABC123"), b);
        assert_eq!(rooms.room_count(), 0);
    }
}
