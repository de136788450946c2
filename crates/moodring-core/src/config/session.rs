//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hours until a session expires after creation.
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
    /// Maximum concurrent users per session.
    #[serde(default = "default_max_users")]
    pub max_users: usize,
    /// Maximum retained chat messages per session (oldest dropped first).
    #[serde(default = "default_max_chat_messages")]
    pub max_chat_messages: usize,
    /// Maximum recently received reactions kept on each user record.
    #[serde(default = "default_recent_reactions")]
    pub recent_reactions: usize,
    /// Interval for expired session cleanup in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
    /// Grace delay in seconds between the end-session broadcast and the purge.
    #[serde(default = "default_end_grace")]
    pub end_grace_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiry_hours: default_expiry_hours(),
            max_users: default_max_users(),
            max_chat_messages: default_max_chat_messages(),
            recent_reactions: default_recent_reactions(),
            cleanup_interval_minutes: default_cleanup_interval(),
            end_grace_seconds: default_end_grace(),
        }
    }
}

fn default_expiry_hours() -> u64 {
    24
}

fn default_max_users() -> usize {
    50
}

fn default_max_chat_messages() -> usize {
    100
}

fn default_recent_reactions() -> usize {
    10
}

fn default_cleanup_interval() -> u64 {
    5
}

fn default_end_grace() -> u64 {
    5
}
