//! Opaque refresh token generation and hashing.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a refresh token (256 bits)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Source of opaque refresh token strings
pub trait TokenGenerator: Send + Sync {
    /// Produces a fresh URL-safe token string
    fn generate(&self) -> String;
}

/// Generates tokens from the operating system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

/// SHA-256 digest of a token, hex encoded. This is what gets stored.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
