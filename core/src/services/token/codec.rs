//! Signed access token encoding and verification

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::domain::entities::{normalize_role, AccessTokenClaims, Account};
use crate::errors::{DomainError, TokenError};
use crate::services::clock::Clock;

use super::config::TokenServiceConfig;

/// Shortest accepted HS256 secret, in bytes
pub const MIN_SECRET_BYTES: usize = 32;

/// Mints and parses HS256 access tokens
///
/// Keys are derived once at construction and never change afterwards.
/// Parsing is pure: no storage is consulted, so an access token stays valid
/// until it expires even if the session behind it is revoked.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: TokenServiceConfig,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec from the signing configuration
    ///
    /// # Returns
    ///
    /// * `Ok(TokenCodec)` - Ready to mint and parse
    /// * `Err(DomainError)` - The secret is shorter than [`MIN_SECRET_BYTES`]
    pub fn new(config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        if config.jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(TokenError::WeakSecret {
                min: MIN_SECRET_BYTES,
            }
            .into());
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        // Expiry is checked against the injected clock after decoding
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[config.issuer.as_str()]);

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            config,
            clock,
        })
    }

    /// Mints an access token for the account's current identity and roles
    ///
    /// `iat` is the clock's current time and `exp` is `iat` plus the access
    /// token lifetime.
    pub fn mint(&self, account: &Account) -> Result<String, DomainError> {
        let claims = AccessTokenClaims::for_account(
            account,
            self.clock.now(),
            self.config.access_ttl(),
            &self.config.issuer,
        );
        self.encode(&claims)
    }

    /// Signs arbitrary claims as they are
    pub fn encode(&self, claims: &AccessTokenClaims) -> Result<String, DomainError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    /// Verifies and decodes an access token
    ///
    /// The signature is checked first, then the claim structure, then expiry.
    ///
    /// # Returns
    ///
    /// * `Ok(AccessTokenClaims)` - The decoded claims, roles normalized
    /// * `Err(TokenError::InvalidSignature)` - Signed with another key
    /// * `Err(TokenError::Malformed)` - Not a JWT, wrong algorithm or bad claims
    /// * `Err(TokenError::Expired)` - Past `exp`
    pub fn parse(&self, token: &str) -> Result<AccessTokenClaims, DomainError> {
        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => DomainError::Token(TokenError::InvalidSignature),
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::Expired),
                _ => DomainError::Token(TokenError::Malformed),
            })?;

        let mut claims = data.claims;
        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::Expired.into());
        }

        claims.roles = claims.roles.iter().map(|r| normalize_role(r)).collect();
        Ok(claims)
    }

    /// Returns whether `token` parses. Never fails; the reason is logged.
    pub fn is_valid(&self, token: &str) -> bool {
        match self.parse(token) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Access token rejected");
                false
            }
        }
    }

    /// Access token lifetime in seconds
    pub fn access_ttl_seconds(&self) -> i64 {
        self.config.access_token_ttl_seconds
    }
}
