//! Password hashing for directory accounts
//!
//! Passwords are stored as `SHA-256(salt || password)` in lowercase hex, with
//! a random 128-bit salt per account. Pure functions only; storage lives in
//! the directory implementation.

use sha2::{Digest, Sha256};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Generate a random salt (32 hex characters)
pub fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Hash a password with the given salt (64 hex characters)
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a password against a stored salt and hash
pub fn verify_password(salt: &str, password: &str, expected_hash: &str) -> bool {
    hash_password(salt, password) == expected_hash
}

/// Normalize an email for account lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: something@something
pub fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_is_random_hex() {
        let a = generate_salt();
        let b = generate_salt();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_deterministic_per_salt() {
        let h1 = hash_password("salt", "hunter22");
        assert_eq!(h1.len(), 64);
        assert_eq!(h1, hash_password("salt", "hunter22"));
        assert_ne!(h1, hash_password("pepper", "hunter22"));
    }

    #[test]
    fn test_verify_password() {
        let salt = generate_salt();
        let hash = hash_password(&salt, "correct horse");
        assert!(verify_password(&salt, "correct horse", &hash));
        assert!(!verify_password(&salt, "wrong horse", &hash));
    }

    #[test]
    fn test_email_helpers() {
        assert_eq!(normalize_email("  Cook@Example.COM "), "cook@example.com");
        assert!(is_plausible_email("cook@example.com"));
        assert!(!is_plausible_email("cook.example.com"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("cook@"));
    }
}
