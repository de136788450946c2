//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound message buffer size per connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum length of a free-text mood status.
    #[serde(default = "default_max_status")]
    pub max_status_length: usize,
    /// Maximum length of a chat message.
    #[serde(default = "default_max_message")]
    pub max_message_length: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            max_status_length: default_max_status(),
            max_message_length: default_max_message(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_status() -> usize {
    100
}

fn default_max_message() -> usize {
    500
}
