//! Username/password verification

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{normalize_username, Account};
use crate::errors::{AuthError, DomainError};
use crate::repositories::AccountRepository;

use super::password::PasswordHasher;

/// Checks a username and password against the stored digest
pub struct CredentialVerifier<U: AccountRepository> {
    accounts: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U: AccountRepository> CredentialVerifier<U> {
    pub fn new(accounts: Arc<U>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Verifies credentials and returns the account
    ///
    /// Unknown user, disabled user and wrong password all fail with the same
    /// `BadCredentials` error. An unknown user still pays for one hash so the
    /// response time does not reveal whether the username exists.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Account, DomainError> {
        let username = normalize_username(username);
        let account = match self.accounts.find_by_username(username).await? {
            Some(account) => account,
            None => {
                let _ = self.hasher.hash(password);
                debug!("Login attempt for unknown username");
                return Err(AuthError::BadCredentials.into());
            }
        };

        if !self.hasher.matches(password, &account.password_hash) {
            debug!(user_id = %account.id, "Login attempt with wrong password");
            return Err(AuthError::BadCredentials.into());
        }

        if !account.is_active() {
            debug!(user_id = %account.id, "Login attempt for disabled account");
            return Err(AuthError::BadCredentials.into());
        }

        Ok(account)
    }
}
