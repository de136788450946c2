//! Session participant model.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::{ConnectionId, Mood, UserId};

use crate::reaction::Reaction;
use crate::view::UserView;

/// A participant in a session.
///
/// A user belongs to exactly one session and lives only as long as it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Generated identifier, scoped to the owning session.
    pub id: UserId,
    /// Display name (length-bounded at the API boundary).
    pub name: String,
    /// Current mood, if the user has set one.
    pub mood: Option<Mood>,
    /// Current free-text status.
    pub status: String,
    /// When the user joined the session.
    pub joined_at: DateTime<Utc>,
    /// When the user last changed mood or status.
    pub last_update: DateTime<Utc>,
    /// Bound WebSocket connection, absent while disconnected.
    #[serde(skip)]
    pub connection: Option<ConnectionId>,
    /// Most recently received reactions, oldest dropped first.
    pub reactions_received: VecDeque<Reaction>,
}

impl User {
    /// Create a new participant with no mood set.
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            name,
            mood: None,
            status: String::new(),
            joined_at: now,
            last_update: now,
            connection: None,
            reactions_received: VecDeque::new(),
        }
    }

    /// Update the user's mood and status.
    pub fn set_mood(&mut self, mood: Mood, status: String, now: DateTime<Utc>) {
        self.mood = Some(mood);
        self.status = status;
        self.last_update = now;
    }

    /// Record a received reaction, keeping at most `cap` recent entries.
    pub fn record_reaction(&mut self, reaction: Reaction, cap: usize) {
        self.reactions_received.push_back(reaction);
        while self.reactions_received.len() > cap {
            self.reactions_received.pop_front();
        }
    }

    /// Sanitized view of this user, safe to send to clients.
    pub fn to_view(&self) -> UserView {
        UserView {
            id: self.id,
            name: self.name.clone(),
            mood: self.mood,
            status: self.status.clone(),
            joined_at: self.joined_at,
            last_update: self.last_update,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodring_core::types::ReactionKind;

    fn reaction(to: UserId) -> Reaction {
        Reaction {
            from_user_id: UserId::new(),
            from_user_name: "Alice".to_string(),
            to_user_id: to,
            kind: ReactionKind::Wave,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_recent_reactions_capped() {
        let mut user = User::new("Bob".to_string(), Utc::now());
        for _ in 0..15 {
            user.record_reaction(reaction(user.id), 10);
        }
        assert_eq!(user.reactions_received.len(), 10);
    }

    #[test]
    fn test_view_hides_connection() {
        let mut user = User::new("Bob".to_string(), Utc::now());
        user.connection = Some(moodring_core::types::ConnectionId::new());
        let json = serde_json::to_value(user.to_view()).expect("serialize");
        assert!(json.get("connection").is_none());
    }
}
