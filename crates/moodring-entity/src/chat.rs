//! Chat messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::{MessageId, UserId};

/// A single chat message within a session.
///
/// The session keeps only the most recent messages (oldest dropped first);
/// see the session config `max_chat_messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier.
    pub id: MessageId,
    /// Author.
    pub user_id: UserId,
    /// Author's display name at send time.
    pub user_name: String,
    /// Message text.
    pub text: String,
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message stamped with the current time.
    pub fn new(user_id: UserId, user_name: String, text: String) -> Self {
        Self {
            id: MessageId::new(),
            user_id,
            user_name,
            text,
            timestamp: Utc::now(),
        }
    }
}
