//! Response DTOs.

use serde::{Deserialize, Serialize};

use moodring_core::types::{SessionCode, UserId};
use moodring_entity::view::SessionView;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Create-session response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    /// The new session's code.
    pub code: SessionCode,
    /// The creator's participant ID.
    pub user_id: UserId,
}

/// Join-session response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinSessionResponse {
    /// The session's public view as of the join.
    pub session: SessionView,
    /// The joiner's participant ID.
    pub user_id: UserId,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Live session count.
    pub sessions: usize,
}
