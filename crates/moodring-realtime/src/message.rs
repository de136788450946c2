//! Wire event types for the WebSocket contract.
//!
//! Events are internally tagged with `type` and named in kebab-case,
//! e.g. `{"type": "update-mood", "code": "ABC-123", ...}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moodring_core::types::{Mood, ReactionKind, SessionCode, UserId};
use moodring_entity::chat::ChatMessage;
use moodring_entity::poll::Poll;
use moodring_entity::vibe::VibeSnapshot;
use moodring_entity::view::{SessionView, UserView};
use moodring_stats::SessionReport;

/// Events sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Bind this connection to a participant and enter the room.
    Join {
        /// Session code.
        code: SessionCode,
        /// The participant, as returned by create/join.
        user_id: UserId,
    },
    /// Set the participant's mood and status line.
    UpdateMood {
        /// Session code.
        code: SessionCode,
        /// The participant.
        user_id: UserId,
        /// New mood.
        mood: Mood,
        /// Free-text status line.
        #[serde(default)]
        status: String,
    },
    /// Send a reaction to another participant.
    SendReaction {
        /// Session code.
        code: SessionCode,
        /// Sender.
        from_user_id: UserId,
        /// Target.
        to_user_id: UserId,
        /// Reaction kind.
        kind: ReactionKind,
    },
    /// Post a chat message to the group.
    SendMessage {
        /// Session code.
        code: SessionCode,
        /// Author.
        user_id: UserId,
        /// Message text.
        text: String,
    },
    /// Open a poll.
    CreatePoll {
        /// Session code.
        code: SessionCode,
        /// Poll creator.
        user_id: UserId,
        /// Poll question.
        question: String,
        /// Option labels.
        options: Vec<String>,
    },
    /// Vote on the active poll.
    VotePoll {
        /// Session code.
        code: SessionCode,
        /// Voter.
        user_id: UserId,
        /// Chosen option.
        option_index: usize,
    },
    /// Discard the active poll.
    ClearPoll {
        /// Session code.
        code: SessionCode,
    },
    /// End the session (creator only).
    EndSession {
        /// Session code.
        code: SessionCode,
        /// The requester, checked against the creator.
        user_id: UserId,
    },
    /// Leave the session, keeping the connection open.
    Leave {
        /// Session code.
        code: SessionCode,
        /// The departing participant.
        user_id: UserId,
    },
}

/// Events sent by the server to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Full public view, sent to a joining connection only.
    SessionState {
        /// The session's current public view.
        session: SessionView,
    },
    /// A new participant arrived, sent to the rest of the room.
    UserJoined {
        /// The arrival.
        user: UserView,
        /// Updated headcount.
        user_count: usize,
    },
    /// A participant's mood changed.
    MoodUpdated {
        /// Who changed.
        user_id: UserId,
        /// New mood.
        mood: Mood,
        /// New status line.
        status: String,
        /// The refreshed group vibe.
        vibe: VibeSnapshot,
    },
    /// A participant left.
    UserLeft {
        /// Who left.
        user_id: UserId,
        /// Their display name.
        user_name: String,
        /// Updated headcount.
        user_count: usize,
    },
    /// A reaction aimed at this connection's participant.
    ReceiveReaction {
        /// Sender's display name.
        from_user_name: String,
        /// The target (this connection's participant).
        to_user_id: UserId,
        /// Reaction kind.
        kind: ReactionKind,
        /// When it was sent.
        timestamp: DateTime<Utc>,
    },
    /// A chat message for the room.
    ReceiveMessage {
        /// The message.
        message: ChatMessage,
    },
    /// A poll was opened.
    PollCreated {
        /// The poll.
        poll: Poll,
    },
    /// The active poll's votes changed.
    PollUpdated {
        /// The poll with updated votes.
        poll: Poll,
    },
    /// The active poll was discarded.
    PollCleared {},
    /// The session ended; this is the final word before the data is gone.
    SessionEnded {
        /// The computed summary report.
        report: SessionReport,
    },
    /// An error for this connection only, never broadcast.
    Error {
        /// Human-readable description.
        message: String,
    },
}
