//! The mood vocabulary shared by the whole application.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A participant's broadcast mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// 😊
    Happy,
    /// 😢
    Sad,
    /// 😴
    Tired,
    /// 🔥
    Energetic,
    /// 💪
    Focused,
}

impl Mood {
    /// All mood kinds, in display order.
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Tired,
        Mood::Energetic,
        Mood::Focused,
    ];

    /// Whether this mood counts toward peak-vibe detection.
    pub fn is_positive(&self) -> bool {
        matches!(self, Mood::Happy | Mood::Energetic | Mood::Focused)
    }

    /// Stable lowercase identifier, matching the wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Tired => "tired",
            Mood::Energetic => "energetic",
            Mood::Focused => "focused",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
