//! Session code generation.

use rand::Rng;

use moodring_core::types::code::{CODE_ALPHABET, CODE_LENGTH, SessionCode};

/// Generate a random session code candidate.
///
/// Uniqueness against live sessions is the store's job; it retries this
/// generator until the candidate does not collide.
pub fn generate() -> SessionCode {
    let mut rng = rand::thread_rng();
    loop {
        let raw: String = (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        if let Some(code) = SessionCode::from_raw(&raw) {
            return code;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_shape() {
        for _ in 0..100 {
            let code = generate();
            let s = code.as_str();
            assert_eq!(s.len(), 7);
            assert_eq!(&s[3..4], "-");
            assert!(
                s.bytes()
                    .enumerate()
                    .all(|(i, b)| i == 3 || CODE_ALPHABET.contains(&b))
            );
        }
    }

    #[test]
    fn test_roundtrips_through_parse() {
        let code = generate();
        let parsed = SessionCode::parse(code.as_str()).expect("own output parses");
        assert_eq!(code, parsed);
    }
}
