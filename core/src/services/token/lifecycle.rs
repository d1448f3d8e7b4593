//! Token lifecycle engine: session issuance, rotation, revocation and sweep

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::Account;
use crate::domain::value_objects::{ClientInfo, SessionTokens};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{AccountRepository, RefreshTokenRepository};
use crate::services::clock::Clock;

use super::codec::TokenCodec;
use super::store::RefreshTokenStore;

/// Orchestrates the access token codec and the refresh token store
///
/// Refresh token states only move forward:
/// `Active -> Revoked`, `Active -> Expired`, and any state `-> Deleted`.
pub struct TokenLifecycleEngine<R, A>
where
    R: RefreshTokenRepository,
    A: AccountRepository,
{
    codec: Arc<TokenCodec>,
    store: RefreshTokenStore<R>,
    accounts: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<R, A> TokenLifecycleEngine<R, A>
where
    R: RefreshTokenRepository,
    A: AccountRepository,
{
    pub fn new(
        codec: Arc<TokenCodec>,
        store: RefreshTokenStore<R>,
        accounts: Arc<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            codec,
            store,
            accounts,
            clock,
        }
    }

    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    pub fn store(&self) -> &RefreshTokenStore<R> {
        &self.store
    }

    /// Issues an access token and a new refresh token for `account`
    ///
    /// Any refresh token the account already holds is superseded.
    pub async fn issue_session(
        &self,
        account: &Account,
        client: &ClientInfo,
    ) -> Result<SessionTokens, DomainError> {
        if !account.is_active() {
            return Err(AuthError::AccountDisabled.into());
        }

        let access_token = self.codec.mint(account)?;
        let refresh = self.store.create(account.id, client).await?;

        info!(user_id = %account.id, "Session issued");

        Ok(SessionTokens::new(
            access_token,
            refresh.token,
            self.codec.access_ttl_seconds(),
            refresh.record.expires_at,
        ))
    }

    /// Exchanges a refresh token for a new token pair
    ///
    /// Checking and revoking the presented token and storing its successor
    /// happen in one store call. Two concurrent rotations of the same token
    /// cannot both succeed, and a concurrent `invalidate_all_sessions`
    /// either rejects the rotation or also removes the successor. The
    /// account is re-read so the new access token reflects its current
    /// roles; a deleted or disabled account gets no tokens and every
    /// session it holds is revoked.
    ///
    /// # Returns
    ///
    /// * `Ok((SessionTokens, Account))` - New pair and the account it asserts
    /// * `Err(TokenError::InvalidRefreshToken)` - Unknown, revoked or expired
    /// * `Err(AuthError::AccountNotFound | AccountDisabled)` - Owner gone or disabled
    pub async fn rotate(
        &self,
        refresh_token: &str,
        client: &ClientInfo,
    ) -> Result<(SessionTokens, Account), DomainError> {
        let (consumed, refresh) = match self.store.rotate(refresh_token, client).await {
            Ok(pair) => pair,
            Err(e) => {
                if let Some(reason) = e.refresh_rejection() {
                    warn!(reason = %reason, "Refresh token rejected");
                }
                return Err(e);
            }
        };

        let account = match self.accounts.find_by_id(consumed.user_id).await? {
            Some(account) if account.is_active() => account,
            Some(account) => {
                warn!(user_id = %account.id, "Refresh for disabled account");
                self.store.revoke_all_for_user(account.id).await?;
                return Err(AuthError::AccountDisabled.into());
            }
            None => {
                warn!(user_id = %consumed.user_id, "Refresh for missing account");
                self.store.revoke_all_for_user(consumed.user_id).await?;
                return Err(AuthError::AccountNotFound.into());
            }
        };

        let access_token = self.codec.mint(&account)?;
        debug!(user_id = %account.id, previous = %consumed.id, "Refresh token rotated");

        let tokens = SessionTokens::new(
            access_token,
            refresh.token,
            self.codec.access_ttl_seconds(),
            refresh.record.expires_at,
        );
        Ok((tokens, account))
    }

    /// Revokes one session; `Ok(false)` when the token is unknown
    pub async fn revoke_session(&self, refresh_token: &str) -> Result<bool, DomainError> {
        let found = self.store.revoke(refresh_token).await?;
        if !found {
            debug!("Revoke requested for unknown refresh token");
        }
        Ok(found)
    }

    /// Revokes and soft-deletes every session of a user
    ///
    /// Access tokens already issued remain valid until they expire.
    pub async fn invalidate_all_sessions(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let count = self.store.revoke_all_for_user(user_id).await?;
        info!(user_id = %user_id, count, "All sessions invalidated");
        Ok(count)
    }

    /// Soft-deletes every refresh token past its expiry
    pub async fn sweep(&self) -> Result<usize, DomainError> {
        let count = self.store.sweep_expired(self.clock.now()).await?;
        info!(count, "Expired refresh tokens swept");
        Ok(count)
    }
}
