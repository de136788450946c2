//! # moodring-core
//!
//! Core crate for Moodring. Contains configuration schemas, typed
//! identifiers, the mood/reaction vocabulary, the session code type,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Moodring crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
