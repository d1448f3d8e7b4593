//! In-memory implementation of RefreshTokenRepository
//!
//! The whole table sits behind one async mutex, so each method is a single
//! critical section and trivially atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::{RefreshToken, SYSTEM_ACTOR};
use crate::errors::{DomainError, RefreshRejection};

use super::r#trait::RefreshTokenRepository;

/// Refresh token table kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryRefreshTokenRepository {
    rows: Arc<Mutex<Vec<RefreshToken>>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored row, soft-deleted ones included
    pub async fn all_rows(&self) -> Vec<RefreshToken> {
        self.rows.lock().await.clone()
    }

    /// Rows belonging to `user_id`, soft-deleted ones included
    pub async fn rows_for_user(&self, user_id: Uuid) -> Vec<RefreshToken> {
        self.rows
            .lock()
            .await
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}

fn live<'a>(rows: &'a mut [RefreshToken], token_hash: &str) -> Option<&'a mut RefreshToken> {
    rows.iter_mut()
        .find(|t| !t.is_deleted && t.token_hash == token_hash)
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut rows = self.rows.lock().await;

        if rows.iter().any(|t| t.token_hash == token.token_hash) {
            return Err(DomainError::internal("Duplicate refresh token digest"));
        }

        for row in rows
            .iter_mut()
            .filter(|t| t.user_id == token.user_id && !t.is_deleted)
        {
            row.soft_delete(token.issued_at, SYSTEM_ACTOR);
        }

        rows.push(token.clone());
        Ok(token)
    }

    async fn find_active(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .find(|t| !t.is_deleted && t.token_hash == token_hash)
            .cloned())
    }

    async fn rotate(
        &self,
        token_hash: &str,
        replacement: RefreshToken,
        now: DateTime<Utc>,
    ) -> Result<(RefreshToken, RefreshToken), DomainError> {
        let mut rows = self.rows.lock().await;

        if rows.iter().any(|t| t.token_hash == replacement.token_hash) {
            return Err(DomainError::internal("Duplicate refresh token digest"));
        }

        let consumed = {
            let token = live(&mut rows, token_hash)
                .filter(|t| t.user_id == replacement.user_id)
                .ok_or(RefreshRejection::NotFound)?;
            token.ensure_usable(now)?;
            token.revoke(now);
            token.clone()
        };

        for row in rows
            .iter_mut()
            .filter(|t| t.user_id == replacement.user_id && !t.is_deleted)
        {
            row.soft_delete(now, SYSTEM_ACTOR);
        }

        rows.push(replacement.clone());
        Ok((consumed, replacement))
    }

    async fn revoke(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().await;

        match live(&mut rows, token_hash) {
            Some(token) => {
                token.revoke(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let mut rows = self.rows.lock().await;
        let mut count = 0;

        for token in rows
            .iter_mut()
            .filter(|t| t.user_id == user_id && !t.is_deleted)
        {
            token.revoke(now);
            token.soft_delete(now, SYSTEM_ACTOR);
            count += 1;
        }

        Ok(count)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut rows = self.rows.lock().await;
        let mut count = 0;

        for token in rows
            .iter_mut()
            .filter(|t| !t.is_deleted && t.is_expired_at(now))
        {
            token.soft_delete(now, SYSTEM_ACTOR);
            count += 1;
        }

        Ok(count)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let rows = self.rows.lock().await;
        let mut tokens: Vec<RefreshToken> = rows
            .iter()
            .filter(|t| t.user_id == user_id && !t.is_deleted)
            .cloned()
            .collect();
        tokens.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(tokens)
    }
}
