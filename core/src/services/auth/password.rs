//! Password hashing seam

use tracing::warn;

use crate::errors::DomainError;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    /// Produces a salted digest of `plaintext`
    fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Checks `plaintext` against a stored digest. A digest that cannot be
    /// read counts as a mismatch.
    fn matches(&self, plaintext: &str, digest: &str) -> bool;
}

/// bcrypt with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn matches(&self, plaintext: &str, digest: &str) -> bool {
        match bcrypt::verify(plaintext, digest) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(error = %e, "Stored password digest could not be verified");
                false
            }
        }
    }
}
