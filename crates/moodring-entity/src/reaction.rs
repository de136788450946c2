//! Reaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::{ReactionKind, UserId};

/// An immutable record of one participant reacting to another.
///
/// Appended to the session's reaction log and to the target user's
/// bounded recent-reactions list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    /// Sender.
    pub from_user_id: UserId,
    /// Sender's display name at send time.
    pub from_user_name: String,
    /// Recipient.
    pub to_user_id: UserId,
    /// Reaction kind.
    pub kind: ReactionKind,
    /// When the reaction was sent.
    pub timestamp: DateTime<Utc>,
}
