//! Request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create-session request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    /// Display name of the creator.
    #[validate(length(min = 1, max = 30, message = "Name must be 1-30 characters"))]
    pub name: String,
}

/// Join-session request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinSessionRequest {
    /// Session code, case and hyphen insensitive.
    #[validate(length(min = 1, message = "Session code is required"))]
    pub code: String,
    /// Display name of the joiner.
    #[validate(length(min = 1, max = 30, message = "Name must be 1-30 characters"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_bounds() {
        let ok = CreateSessionRequest { name: "Maya".into() };
        assert!(ok.validate().is_ok());

        let empty = CreateSessionRequest { name: String::new() };
        assert!(empty.validate().is_err());

        let long = CreateSessionRequest {
            name: "x".repeat(31),
        };
        assert!(long.validate().is_err());
    }
}
