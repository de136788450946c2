//! # moodring-engine
//!
//! The authoritative in-memory session engine: the live-session registry,
//! session lifecycle (create, join, leave, expiry, deletion), code
//! generation, and the deferred post-end purge.
//!
//! The registry is an explicit store owned by the process (constructed at
//! startup, injected into the gateway and the HTTP layer), never a bare
//! global. All state dies with the process.

pub mod codegen;
pub mod store;

pub use store::{MoodUpdate, ReactionRecord, RemoveOutcome, SessionStore};
