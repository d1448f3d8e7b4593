//! Session results handed back to callers after login or refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Account;

/// Token type advertised alongside access tokens
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// An access token paired with the refresh token that can renew it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Signed JWT access token
    pub access_token: String,

    /// Opaque refresh token string
    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// When the refresh token stops being accepted
    pub refresh_expires_at: DateTime<Utc>,
}

impl SessionTokens {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        refresh_expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
            refresh_expires_at,
        }
    }
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub enabled: bool,
    pub roles: Vec<String>,
}

impl From<&Account> for UserInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            full_name: account.full_name.clone(),
            enabled: account.enabled,
            roles: account.roles.iter().cloned().collect(),
        }
    }
}

/// Where a session request came from, recorded on the refresh token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
        }
    }
}

/// Tokens issued for an account together with its public view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedSession {
    pub tokens: SessionTokens,
    pub user: UserInfo,
}
