//! Refresh token store: opaque token generation on top of the repository.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::RefreshToken;
use crate::domain::value_objects::ClientInfo;
use crate::errors::{DomainError, RefreshRejection};
use crate::repositories::RefreshTokenRepository;
use crate::services::clock::Clock;

use super::generator::{hash_token, TokenGenerator};

/// A freshly created refresh token together with its plaintext value
///
/// The plaintext only exists here; the stored record carries its digest.
#[derive(Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub record: RefreshToken,
}

impl fmt::Debug for IssuedRefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedRefreshToken")
            .field("token", &"<redacted>")
            .field("record", &self.record)
            .finish()
    }
}

/// Refresh token operations addressed by plaintext token
pub struct RefreshTokenStore<R: RefreshTokenRepository> {
    repository: Arc<R>,
    generator: Arc<dyn TokenGenerator>,
    clock: Arc<dyn Clock>,
    refresh_ttl: Duration,
}

impl<R: RefreshTokenRepository> RefreshTokenStore<R> {
    pub fn new(
        repository: Arc<R>,
        generator: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            generator,
            clock,
            refresh_ttl,
        }
    }

    /// Creates the user's only live refresh token
    ///
    /// Earlier rows for the user are soft-deleted in the same unit of work.
    pub async fn create(
        &self,
        user_id: Uuid,
        client: &ClientInfo,
    ) -> Result<IssuedRefreshToken, DomainError> {
        let token = self.generator.generate();
        let record = RefreshToken::issue(
            user_id,
            hash_token(&token),
            self.clock.now(),
            self.refresh_ttl,
            client.ip_address.clone(),
            client.user_agent.clone(),
        );

        let record = self.repository.create(record).await?;
        debug!(user_id = %user_id, token_id = %record.id, "Refresh token created");

        Ok(IssuedRefreshToken { token, record })
    }

    /// Looks up a non-deleted token, whatever its revoked or expiry state
    pub async fn find_active(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        self.repository.find_active(&hash_token(token)).await
    }

    /// Exchanges a usable token for a fresh one owned by the same user
    ///
    /// The check, the revocation of `token` and the insert of its successor
    /// are one repository call.
    ///
    /// # Returns
    ///
    /// * `Ok((RefreshToken, IssuedRefreshToken))` - Revoked predecessor and successor
    /// * `Err(TokenError::InvalidRefreshToken)` - Unknown, revoked or expired
    pub async fn rotate(
        &self,
        token: &str,
        client: &ClientInfo,
    ) -> Result<(RefreshToken, IssuedRefreshToken), DomainError> {
        let token_hash = hash_token(token);
        let owner = self
            .repository
            .find_active(&token_hash)
            .await?
            .ok_or(RefreshRejection::NotFound)?
            .user_id;

        let now = self.clock.now();
        let replacement = self.generator.generate();
        let record = RefreshToken::issue(
            owner,
            hash_token(&replacement),
            now,
            self.refresh_ttl,
            client.ip_address.clone(),
            client.user_agent.clone(),
        );

        let (consumed, record) = self.repository.rotate(&token_hash, record, now).await?;
        debug!(user_id = %owner, token_id = %record.id, "Refresh token replaced");

        Ok((
            consumed,
            IssuedRefreshToken {
                token: replacement,
                record,
            },
        ))
    }

    /// Revokes a token; `Ok(false)` when no live row matches
    pub async fn revoke(&self, token: &str) -> Result<bool, DomainError> {
        self.repository
            .revoke(&hash_token(token), self.clock.now())
            .await
    }

    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        self.repository
            .revoke_all_for_user(user_id, self.clock.now())
            .await
    }

    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.repository.sweep_expired(now).await
    }

    /// Refresh token lifetime
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
