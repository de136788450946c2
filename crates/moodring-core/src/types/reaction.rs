//! The reaction vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A quick reaction one participant sends to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    /// ❤️
    Hug,
    /// 👋
    Wave,
    /// ☕ "Chai break?"
    Chai,
    /// 🔥 "Let's go!"
    Letgo,
    /// 💪 "You got this!"
    Encourage,
}

impl ReactionKind {
    /// Stable lowercase identifier, matching the wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Hug => "hug",
            ReactionKind::Wave => "wave",
            ReactionKind::Chai => "chai",
            ReactionKind::Letgo => "letgo",
            ReactionKind::Encourage => "encourage",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
