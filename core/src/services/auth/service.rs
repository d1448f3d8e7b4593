//! Session façade: registration, login, refresh, logout and password change

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::{normalize_username, Account};
use crate::domain::value_objects::{AuthenticatedSession, ClientInfo, UserInfo};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};
use crate::services::token::TokenLifecycleEngine;

use super::config::AuthServiceConfig;
use super::credentials::CredentialVerifier;
use super::password::PasswordHasher;

/// Authentication service combining credential checks with the token lifecycle
pub struct AuthService<U, Ro, R>
where
    U: AccountRepository,
    Ro: RoleRepository,
    R: RefreshTokenRepository,
{
    /// Account persistence
    accounts: Arc<U>,
    /// Role lookup for registration
    roles: Arc<Ro>,
    /// Username/password checks
    verifier: CredentialVerifier<U>,
    /// Token issuance and rotation
    lifecycle: Arc<TokenLifecycleEngine<R, U>>,
    hasher: Arc<dyn PasswordHasher>,
    config: AuthServiceConfig,
}

impl<U, Ro, R> AuthService<U, Ro, R>
where
    U: AccountRepository,
    Ro: RoleRepository,
    R: RefreshTokenRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `accounts` - Repository for account persistence
    /// * `roles` - Repository for role lookup
    /// * `lifecycle` - Token lifecycle engine sharing the same account repository
    /// * `hasher` - Password hashing primitive
    /// * `config` - Service configuration
    pub fn new(
        accounts: Arc<U>,
        roles: Arc<Ro>,
        lifecycle: Arc<TokenLifecycleEngine<R, U>>,
        hasher: Arc<dyn PasswordHasher>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            verifier: CredentialVerifier::new(accounts.clone(), hasher.clone()),
            accounts,
            roles,
            lifecycle,
            hasher,
            config,
        }
    }

    pub fn lifecycle(&self) -> &Arc<TokenLifecycleEngine<R, U>> {
        &self.lifecycle
    }

    /// Register a new account holding the default role
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The stored account
    /// * `Err(AuthError::AlreadyExists)` - Username taken
    /// * `Err(AuthError::RoleNotFound)` - Default role missing from storage
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        full_name: Option<String>,
    ) -> DomainResult<Account> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(DomainError::Validation {
                message: "Username must not be empty".to_string(),
            });
        }
        if password.is_empty() {
            return Err(DomainError::Validation {
                message: "Password must not be empty".to_string(),
            });
        }

        if self.accounts.exists_by_username(username).await? {
            return Err(AuthError::AlreadyExists {
                username: username.to_string(),
            }
            .into());
        }

        let role = self
            .roles
            .find_by_name(&self.config.default_role)
            .await?
            .ok_or_else(|| AuthError::RoleNotFound {
                name: self.config.default_role.clone(),
            })?;

        let password_hash = self.hasher.hash(password)?;
        let account = Account::new(username, password_hash, full_name, [role.name]);

        // The repository enforces uniqueness again for concurrent registrations
        let account = self.accounts.create(account).await?;
        info!(user_id = %account.id, "Account registered");

        Ok(account)
    }

    /// Authenticate with username and password and open a session
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        client: &ClientInfo,
    ) -> DomainResult<AuthenticatedSession> {
        let account = self.verifier.verify(username, password).await?;
        let tokens = self.lifecycle.issue_session(&account, client).await?;

        info!(user_id = %account.id, "Login succeeded");

        Ok(AuthenticatedSession {
            tokens,
            user: UserInfo::from(&account),
        })
    }

    /// Exchange a refresh token for a new access and refresh token
    pub async fn refresh(
        &self,
        refresh_token: &str,
        client: &ClientInfo,
    ) -> DomainResult<AuthenticatedSession> {
        let (tokens, account) = self.lifecycle.rotate(refresh_token, client).await?;

        Ok(AuthenticatedSession {
            tokens,
            user: UserInfo::from(&account),
        })
    }

    /// End the session behind `refresh_token`
    ///
    /// Logging out twice, or with a token that is unknown, succeeds quietly.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        if self.lifecycle.revoke_session(refresh_token).await? {
            info!("Logout succeeded");
        }
        Ok(())
    }

    /// Replace the account's password and end all of its sessions
    ///
    /// Access tokens issued before the change stay valid until they expire.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Password changed, refresh tokens revoked
    /// * `Err(AuthError::InvalidPassword)` - `old_password` does not match
    /// * `Err(AuthError::AccountNotFound)` - No such account
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !self.hasher.matches(old_password, &account.password_hash) {
            warn!(user_id = %account.id, "Password change with wrong current password");
            return Err(AuthError::InvalidPassword.into());
        }

        if new_password.is_empty() {
            return Err(DomainError::Validation {
                message: "New password must not be empty".to_string(),
            });
        }

        account.set_password_hash(self.hasher.hash(new_password)?);
        let account = self.accounts.update(account).await?;

        self.lifecycle.invalidate_all_sessions(account.id).await?;
        info!(user_id = %account.id, "Password changed");

        Ok(())
    }

    /// Public view of an account
    pub async fn get_user_info(&self, username: &str) -> DomainResult<UserInfo> {
        let account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(UserInfo::from(&account))
    }
}
