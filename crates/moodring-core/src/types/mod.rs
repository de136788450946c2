//! Shared domain types: identifiers, session codes, and the mood and
//! reaction vocabularies.

pub mod code;
pub mod id;
pub mod mood;
pub mod reaction;

pub use code::SessionCode;
pub use id::{ConnectionId, MessageId, UserId};
pub use mood::Mood;
pub use reaction::ReactionKind;
