//! Account repository trait defining the interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Account;
use crate::errors::DomainError;

/// Repository trait for Account entity persistence operations
///
/// Lookups only ever return accounts that have not been soft-deleted.
/// Whether an account is enabled is left to the caller to check.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its ID
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No live account with that ID
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Find an account by its username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Check whether a live account already uses `username`
    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError>;

    /// Persist a new account together with its role assignments
    ///
    /// # Returns
    /// * `Ok(Account)` - The stored account
    /// * `Err(DomainError::Auth(AuthError::AlreadyExists))` - Username taken
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Save changes to an existing account (password, name, enabled flag)
    ///
    /// # Returns
    /// * `Ok(Account)` - The updated account
    /// * `Err(DomainError::Auth(AuthError::AccountNotFound))` - No such account
    async fn update(&self, account: Account) -> Result<Account, DomainError>;
}
