//! Human-shareable session codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The alphabet session codes are drawn from: uppercase letters and digits.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of alphabet characters in a code (rendered as two groups of three).
pub const CODE_LENGTH: usize = 6;

/// A human-shareable session identifier in the fixed shape `ABC-123`:
/// six characters from [`CODE_ALPHABET`], rendered as two groups of three
/// separated by a hyphen.
///
/// Codes are unique among live sessions only; a code becomes reusable once
/// its session is purged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCode(String);

impl SessionCode {
    /// Build a code from six raw alphabet characters, inserting the hyphen.
    ///
    /// Returns `None` if the input is not exactly six alphabet characters.
    pub fn from_raw(raw: &str) -> Option<Self> {
        if raw.len() != CODE_LENGTH || !raw.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return None;
        }
        Some(Self(format!("{}-{}", &raw[..3], &raw[3..])))
    }

    /// Parse a user-supplied code, normalizing to uppercase.
    ///
    /// Accepts either the hyphenated form (`ABC-123`) or the bare six
    /// characters (`abc123`).
    pub fn parse(input: &str) -> Option<Self> {
        let upper = input.trim().to_uppercase();
        let raw: String = upper.chars().filter(|c| *c != '-').collect();
        Self::from_raw(&raw)
    }

    /// Return the code as a string slice (hyphenated form).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_inserts_hyphen() {
        let code = SessionCode::from_raw("ABC123").expect("valid raw");
        assert_eq!(code.as_str(), "ABC-123");
    }

    #[test]
    fn test_from_raw_rejects_bad_input() {
        assert!(SessionCode::from_raw("ABC12").is_none());
        assert!(SessionCode::from_raw("ABC1234").is_none());
        assert!(SessionCode::from_raw("abc123").is_none());
        assert!(SessionCode::from_raw("ABC-12").is_none());
    }

    #[test]
    fn test_parse_normalizes() {
        let a = SessionCode::parse("abc-123").expect("hyphenated");
        let b = SessionCode::parse("ABC123").expect("bare");
        let c = SessionCode::parse("  abc123  ").expect("whitespace");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "ABC-123");
    }

    #[test]
    fn test_serde_is_transparent() {
        let code = SessionCode::from_raw("XYZ789").expect("valid raw");
        let json = serde_json::to_string(&code).expect("serialize");
        assert_eq!(json, "\"XYZ-789\"");
    }
}
