//! Identifier generation for links and short codes.
//!
//! Short codes are the public enumeration surface, so they are drawn from
//! the thread-local CSPRNG rather than a seedable generator.

use rand::Rng;
use uuid::Uuid;

/// Default short code length. 62^6 gives a keyspace of ~5.7e10.
pub const SHORT_CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a globally unique link identifier (UUID v4, hyphenated form).
pub fn new_link_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a random short code of `len` characters from the 62-symbol
/// alphanumeric alphabet. Sampling via `random_range` keeps the draw
/// uniform (no modulo bias).
pub fn new_short_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn short_code_has_requested_length() {
        for len in [1, 6, 12] {
            assert_eq!(new_short_code(len).len(), len);
        }
    }

    #[test]
    fn short_code_uses_alphanumeric_alphabet() {
        for _ in 0..100 {
            let code = new_short_code(SHORT_CODE_LEN);
            assert!(
                code.bytes().all(|b| ALPHABET.contains(&b)),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn short_codes_do_not_collide_in_practice() {
        let codes: HashSet<String> = (0..1000).map(|_| new_short_code(SHORT_CODE_LEN)).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn link_ids_are_valid_uuids() {
        let id = new_link_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_link_id());
    }
}
