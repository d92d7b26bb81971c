// src/token.rs

//! Download token issuance policy.

use rand::Rng;

/// Alphabet tokens are drawn from.
pub const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of an issued token.
pub const TOKEN_LEN: usize = 8;

/// Generate a fresh download token.
///
/// Tokens gate a report download and are recoverable by anyone holding the
/// matching LRN and surname; they are claim tickets, not secrets, so a
/// non-cryptographic RNG is sufficient.
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Whether a string matches the issued-token shape.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_well_formed() {
        for _ in 0..100 {
            let token = generate();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(is_well_formed(&token), "bad token: {token}");
        }
    }

    #[test]
    fn shape_check_rejects_other_strings() {
        assert!(is_well_formed("AB12CD34"));
        assert!(!is_well_formed("ab12cd34"));
        assert!(!is_well_formed("AB12CD3"));
        assert!(!is_well_formed("AB12CD345"));
        assert!(!is_well_formed("AB12CD3!"));
        assert!(!is_well_formed(""));
    }
}
