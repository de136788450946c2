//! Public (client-facing) views of session state.
//!
//! Views never expose connection references and always carry the current
//! vibe snapshot, the full chat log, and the active poll (or null).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::{Mood, SessionCode, UserId};

use crate::chat::ChatMessage;
use crate::poll::Poll;
use crate::reaction::Reaction;
use crate::timeline::MoodEntry;
use crate::vibe::VibeSnapshot;

/// Sanitized view of a participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Current mood, if set.
    pub mood: Option<Mood>,
    /// Current free-text status.
    pub status: String,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
    /// When the user last changed mood or status.
    pub last_update: DateTime<Utc>,
}

/// The full public view of a session, as sent to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    /// Session code.
    pub code: SessionCode,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// Current participant count.
    pub user_count: usize,
    /// Participants in join order (the first is the creator).
    pub users: Vec<UserView>,
    /// Current aggregate vibe.
    pub vibe: VibeSnapshot,
    /// Full retained chat log, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Active poll, or null.
    pub poll: Option<Poll>,
}

impl SessionView {
    /// The creator is the first user in join order.
    pub fn creator_id(&self) -> Option<UserId> {
        self.users.first().map(|u| u.id)
    }
}

/// The one-shot capture handed to the stats aggregator at session end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Final public view.
    pub session: SessionView,
    /// Full mood timeline.
    pub mood_timeline: Vec<MoodEntry>,
    /// Full reaction log.
    pub reactions_log: Vec<Reaction>,
}
