//! Account entity for username/password authentication.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Username as stored and looked up, from the form a client typed
///
/// Registration and login both pass usernames through this.
pub fn normalize_username(raw: &str) -> &str {
    raw.trim()
}

/// A user account that can log in and hold refresh tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Login name, unique across non-deleted accounts
    pub username: String,

    /// Password digest produced by the configured hasher
    pub password_hash: String,

    /// Optional display name
    pub full_name: Option<String>,

    /// Disabled accounts cannot log in or refresh
    pub enabled: bool,

    /// Names of the roles held by the account
    pub roles: BTreeSet<String>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last modification
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker
    pub is_deleted: bool,

    pub deleted_at: Option<DateTime<Utc>>,

    pub deleted_by: Option<String>,
}

impl Account {
    /// Creates a new enabled account
    ///
    /// # Arguments
    ///
    /// * `username` - The login name
    /// * `password_hash` - Digest of the password, never the plaintext
    /// * `full_name` - Optional display name
    /// * `roles` - Role names granted to the account
    pub fn new<I>(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        full_name: Option<String>,
        roles: I,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            full_name,
            enabled: true,
            roles: roles.into_iter().collect(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// Replaces the stored password digest
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.updated_at = Utc::now();
    }

    /// Disables the account so it can no longer log in or refresh
    pub fn disable(&mut self) {
        self.enabled = false;
        self.updated_at = Utc::now();
    }

    /// Re-enables a disabled account
    pub fn enable(&mut self) {
        self.enabled = true;
        self.updated_at = Utc::now();
    }

    /// Whether the account may authenticate
    pub fn is_active(&self) -> bool {
        self.enabled && !self.is_deleted
    }
}
