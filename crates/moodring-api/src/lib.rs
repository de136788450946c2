//! # moodring-api
//!
//! The HTTP surface: axum routes for session lifecycle and health, the
//! WebSocket upgrade feeding the realtime gateway, request/response
//! DTOs, and the domain-error-to-HTTP mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
