//! Report types produced by the aggregation pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::{Mood, SessionCode, UserId};

/// The full end-of-session summary broadcast to the group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session-level totals.
    pub overview: Overview,
    /// Count and share per mood kind over the full timeline.
    pub mood_distribution: Vec<MoodSlice>,
    /// The 10-minute window with the most positive-mood entries.
    pub peak_vibe: Option<PeakVibe>,
    /// The user who most often matched each 5-minute window's dominant mood.
    pub mood_influencer: Option<MoodInfluencer>,
    /// Superlatives across the session.
    pub highlights: Highlights,
    /// Per-participant rollups, in join order.
    pub participants: Vec<ParticipantSummary>,
}

/// Session-level totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    /// Session code.
    pub code: SessionCode,
    /// Formatted elapsed time from creation to report time.
    pub duration: String,
    /// Final participant count.
    pub total_participants: usize,
    /// Total mood changes over the session.
    pub total_mood_changes: usize,
    /// When the session was created.
    pub started_at: DateTime<Utc>,
    /// When the report was produced.
    pub ended_at: DateTime<Utc>,
}

/// One mood kind's share of the full timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSlice {
    /// The mood.
    pub mood: Mood,
    /// Timeline entries with this mood.
    pub count: usize,
    /// Rounded percentage of the timeline (zero when the timeline is empty).
    pub percentage: u8,
}

/// The window with the most positive-mood entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakVibe {
    /// Start of the winning 10-minute window.
    pub window_start: DateTime<Utc>,
    /// Positive-mood entries in that window.
    pub positive_count: usize,
    /// Most frequent mood within the window.
    pub mood: Mood,
}

/// The participant whose moods best tracked the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodInfluencer {
    /// The user.
    pub user_id: UserId,
    /// Their display name.
    pub name: String,
    /// Rounded percentage of their windows matching the window's
    /// dominant mood.
    pub percentage: u8,
}

/// Superlatives across the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlights {
    /// Longest continuous same-mood run by a single user.
    pub longest_streak: Option<Streak>,
    /// The user with the most mood changes.
    pub most_changes: Option<CountedUser>,
    /// The user who sent the most reactions.
    pub most_reactions_sent: Option<CountedUser>,
    /// The user who received the most reactions.
    pub most_reactions_received: Option<CountedUser>,
}

/// A maximal run of consecutive timeline entries by one user holding
/// one mood.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streak {
    /// The user.
    pub user_id: UserId,
    /// Their display name.
    pub user_name: String,
    /// The mood held throughout the run.
    pub mood: Mood,
    /// Last entry's time minus first entry's time, in seconds.
    pub duration_secs: i64,
    /// The same, formatted.
    pub duration_text: String,
}

/// A user paired with a tally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountedUser {
    /// The user.
    pub user_id: UserId,
    /// Their display name.
    pub user_name: String,
    /// The tally.
    pub count: usize,
}

/// Per-participant rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSummary {
    /// The user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Their most frequent mood over the timeline, if they set any.
    pub most_frequent_mood: Option<Mood>,
    /// Formatted elapsed time since they joined.
    pub time_in_session: String,
    /// Reactions they sent.
    pub reactions_sent: usize,
    /// Reactions they received.
    pub reactions_received: usize,
}
