//! Token entities for JWT access tokens and store-backed refresh tokens.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Account;
use super::role::normalize_role;
use crate::errors::RefreshRejection;

/// Actor recorded on rows soft-deleted by the service itself
pub const SYSTEM_ACTOR: &str = "SYSTEM";

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (username)
    pub sub: String,

    /// Account identifier
    #[serde(rename = "userId")]
    pub user_id: Uuid,

    /// Role names, always `ROLE_` prefixed
    pub roles: BTreeSet<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl AccessTokenClaims {
    /// Builds claims for an account's current identity and roles
    ///
    /// # Arguments
    ///
    /// * `account` - The account the token asserts
    /// * `issued_at` - Mint time
    /// * `ttl` - Access token lifetime
    /// * `issuer` - Value of the `iss` claim
    pub fn for_account(
        account: &Account,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        issuer: &str,
    ) -> Self {
        Self {
            sub: account.username.clone(),
            user_id: account.id,
            roles: account.roles.iter().map(|r| normalize_role(r)).collect(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks whether the claims have expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Checks whether the claims carry `role`, comparing normalized names
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(&normalize_role(role))
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Lifecycle state of a refresh token at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Revoked,
    Expired,
    Deleted,
}

/// Refresh token entity stored in the database
///
/// Only the SHA-256 digest of the opaque token string is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// Account this token belongs to
    pub user_id: Uuid,

    /// Hashed token value
    pub token_hash: String,

    /// Timestamp when the token was issued
    pub issued_at: DateTime<Utc>,

    /// Fixed at issue time, never extended
    pub expires_at: DateTime<Utc>,

    /// Revocation is permanent
    pub revoked: bool,

    pub revoked_at: Option<DateTime<Utc>>,

    /// Client address that obtained the token
    pub ip_address: Option<String>,

    /// Client user agent that obtained the token
    pub user_agent: Option<String>,

    /// Soft-delete marker; deleted rows are invisible to lookups
    pub is_deleted: bool,

    pub deleted_at: Option<DateTime<Utc>>,

    pub deleted_by: Option<String>,
}

impl RefreshToken {
    /// Creates a new active refresh token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The owning account
    /// * `token_hash` - Digest of the opaque token string
    /// * `issued_at` - Issue time
    /// * `ttl` - Refresh token lifetime
    /// * `ip_address` - Client address, if known
    /// * `user_agent` - Client user agent, if known
    pub fn issue(
        user_id: Uuid,
        token_hash: String,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            issued_at,
            expires_at: issued_at + ttl,
            revoked: false,
            revoked_at: None,
            ip_address,
            user_agent,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// Checks if the token is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Lifecycle state at `now`. Deletion wins over revocation, which wins
    /// over expiry.
    pub fn state_at(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.is_deleted {
            RefreshTokenState::Deleted
        } else if self.revoked {
            RefreshTokenState::Revoked
        } else if self.is_expired_at(now) {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == RefreshTokenState::Active
    }

    /// Checks that the token may be exchanged at `now`
    ///
    /// Revocation is reported before expiry, so a revoked token that has
    /// also expired reads as revoked.
    pub fn ensure_usable(&self, now: DateTime<Utc>) -> Result<(), RefreshRejection> {
        match self.state_at(now) {
            RefreshTokenState::Active => Ok(()),
            RefreshTokenState::Revoked => Err(RefreshRejection::Revoked),
            RefreshTokenState::Expired => Err(RefreshRejection::Expired),
            RefreshTokenState::Deleted => Err(RefreshRejection::NotFound),
        }
    }

    /// Revokes the token. A second call keeps the original `revoked_at`.
    pub fn revoke(&mut self, now: DateTime<Utc>) {
        if !self.revoked {
            self.revoked = true;
            self.revoked_at = Some(now);
        }
    }

    /// Soft-deletes the token on behalf of `actor`
    pub fn soft_delete(&mut self, now: DateTime<Utc>, actor: &str) {
        if !self.is_deleted {
            self.is_deleted = true;
            self.deleted_at = Some(now);
            self.deleted_by = Some(actor.to_string());
        }
    }
}
