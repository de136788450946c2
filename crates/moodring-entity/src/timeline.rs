//! Mood timeline entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::{Mood, UserId};

/// An immutable record of one mood change, appended to the session's
/// mood timeline on every update.
///
/// Never deleted during the session's life; this is the durable record
/// the stats aggregator consumes at session end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    /// The user whose mood changed.
    pub user_id: UserId,
    /// The new mood.
    pub mood: Mood,
    /// The free-text status accompanying the change.
    pub status: String,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
}
