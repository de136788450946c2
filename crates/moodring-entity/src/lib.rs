//! # moodring-entity
//!
//! Domain entity models for Moodring. Every struct in this crate
//! represents an in-memory session record or a domain value object.
//! All entities derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod chat;
pub mod poll;
pub mod reaction;
pub mod session;
pub mod timeline;
pub mod user;
pub mod vibe;
pub mod view;

pub use chat::ChatMessage;
pub use poll::Poll;
pub use reaction::Reaction;
pub use session::Session;
pub use timeline::MoodEntry;
pub use user::User;
pub use vibe::VibeSnapshot;
pub use view::{SessionSnapshot, SessionView, UserView};
