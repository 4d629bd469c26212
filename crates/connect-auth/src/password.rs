//! Password hashing
//!
//! bcrypt, with the cost stored in the hash itself so it can be raised
//! later without invalidating existing accounts.

use crate::error::{AuthError, AuthResult};

/// Default bcrypt cost.
pub const DEFAULT_COST: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Hashes and verifies passwords.
///
/// # Example
///
/// ```
/// use connect_auth::PasswordHasher;
///
/// let hasher = PasswordHasher::new(4);
/// let encoded = hasher.hash("hunter22").unwrap();
/// assert!(hasher.verify("hunter22", &encoded));
/// assert!(!hasher.verify("hunter23", &encoded));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    /// A hasher with the given cost, clamped to bcrypt's 4..=31.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {}", e)))
    }

    /// Check `password` against a stored hash. Malformed hashes never verify.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        bcrypt::verify(password, encoded).unwrap_or(false)
    }

    /// Spend one hash worth of work and fail.
    ///
    /// Used when there is no stored hash to check against, so a lookup
    /// miss costs about as much as a wrong password.
    pub fn reject(&self, password: &str) -> bool {
        let _ = bcrypt::hash(password, self.cost);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new(4);
        let a = hasher.hash("secret1").unwrap();
        let b = hasher.hash("secret1").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$2b$04$"));
        assert!(hasher.verify("secret1", &a));
        assert!(hasher.verify("secret1", &b));
        assert!(!hasher.verify("secret2", &a));
    }

    #[test]
    fn test_stored_cost_wins() {
        let encoded = PasswordHasher::new(5).hash("pw1234").unwrap();
        assert!(PasswordHasher::new(4).verify("pw1234", &encoded));
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(PasswordHasher::new(0).cost(), MIN_COST);
        assert_eq!(PasswordHasher::new(1_000).cost(), MAX_COST);
        assert_eq!(PasswordHasher::default().cost(), DEFAULT_COST);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = PasswordHasher::new(4);
        assert!(!hasher.verify("x", ""));
        assert!(!hasher.verify("x", "sha256$10$abc$def"));
        assert!(!hasher.verify("x", "$2b$04$tooshort"));
    }

    #[test]
    fn test_reject_always_fails() {
        assert!(!PasswordHasher::new(4).reject("anything"));
    }
}
