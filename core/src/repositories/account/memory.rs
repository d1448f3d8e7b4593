//! In-memory implementation of AccountRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Account;
use crate::errors::{AuthError, DomainError};

use super::r#trait::AccountRepository;

/// Account repository backed by a map, for tests and storage-less runs
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts, including soft-deleted ones
    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).filter(|a| !a.is_deleted).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| !a.is_deleted && a.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .any(|a| !a.is_deleted && a.username == username))
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        // Check and insert under one lock so concurrent registrations collide here
        if accounts
            .values()
            .any(|a| !a.is_deleted && a.username == account.username)
        {
            return Err(AuthError::AlreadyExists {
                username: account.username,
            }
            .into());
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        match accounts.get_mut(&account.id) {
            Some(existing) if !existing.is_deleted => {
                *existing = account.clone();
                Ok(account)
            }
            _ => Err(AuthError::AccountNotFound.into()),
        }
    }
}
