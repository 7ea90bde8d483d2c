//! Invite token generation and hashing.
//!
//! Invite tokens are opaque random strings; only their SHA-256 hash is
//! stored server-side so a database leak does not compromise outstanding
//! invites. The raw token travels to the employee by email and comes back
//! either in the verify-invite request body or in the session cookie.
//!
//! Tokens are high-entropy and single-use per invite, so no per-record
//! salt is required.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a raw invite token (hex-encoded to 64 chars).
pub const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random invite token (lower-hex).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Compute the SHA-256 hex digest of a token.
///
/// Use this to compare an incoming token against the stored hash.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a presented token against a stored digest by re-hashing.
pub fn verify_token(presented: &str, stored_digest: &str) -> bool {
    hash_token(presented) == stored_digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_is_deterministic() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        // SHA-256 hex digest is 64 chars.
        assert_eq!(hash_token(&token).len(), 64);
    }

    #[test]
    fn verify_accepts_matching_token_only() {
        let token = generate_token();
        let digest = hash_token(&token);
        assert!(verify_token(&token, &digest));
        assert!(!verify_token("not-the-token", &digest));
    }
}
