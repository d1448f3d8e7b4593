//! Refresh token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken entity persistence operations
///
/// Every method is atomic with respect to other calls touching the same
/// user's rows. Rows are addressed by the SHA-256 digest of the opaque
/// token, never by the plaintext. Soft-deleted rows are invisible to every
/// method; they remain in storage for auditing.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Store a new refresh token, superseding the user's existing ones
    ///
    /// All non-deleted rows of `token.user_id` are soft-deleted (actor
    /// `SYSTEM`, time `token.issued_at`) and the new row inserted in the
    /// same unit of work. Prior rows are not revoked.
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The stored token
    /// * `Err(DomainError)` - Save failed (e.g., duplicate digest)
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a non-deleted token by digest, whatever its revoked or expiry state
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found
    /// * `Ok(None)` - No live row with that digest
    /// * `Err(DomainError)` - Storage failure
    async fn find_active(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Exchange a usable token for `replacement` in one unit of work
    ///
    /// Checks the token behind `token_hash` is usable at `now` and revokes
    /// it, soft-deletes the owner's other live rows and inserts
    /// `replacement`. A `revoke_all_for_user` for the same user either
    /// happens entirely before (and the rotation is rejected) or entirely
    /// after (and removes the replacement too). Of two concurrent calls for
    /// the same digest at most one succeeds. `replacement.user_id` must be
    /// the owner of the presented token.
    ///
    /// # Returns
    /// * `Ok((consumed, stored))` - The revoked predecessor and the new row
    /// * `Err(DomainError::Token(TokenError::InvalidRefreshToken { .. }))` -
    ///   Not found, already revoked, expired, or owned by another user
    async fn rotate(
        &self,
        token_hash: &str,
        replacement: RefreshToken,
        now: DateTime<Utc>,
    ) -> Result<(RefreshToken, RefreshToken), DomainError>;

    /// Revoke a token by digest
    ///
    /// Revoking an already revoked token keeps its original `revoked_at`.
    ///
    /// # Returns
    /// * `Ok(true)` - A live row was found (and is now revoked)
    /// * `Ok(false)` - No live row with that digest
    async fn revoke(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Revoke and soft-delete every live token of a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows affected
    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError>;

    /// Soft-delete every live row whose `expires_at` is before `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows swept
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// List a user's live rows, newest first
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;
}
