//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! Mutations that touch a user's token set first lock that user's row in
//! `app_users`, so concurrent logins and revocations for one user apply
//! one after another. Single-token mutations lock the token row itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use ak_core::domain::entities::{RefreshToken, SYSTEM_ACTOR};
use ak_core::errors::{DomainError, RefreshRejection};
use ak_core::repositories::RefreshTokenRepository;

use super::{db_error, is_unique_violation, parse_uuid};

const TOKEN_COLUMNS: &str = "id, user_id, token_hash, issued_at, expires_at, revoked, \
     revoked_at, ip_address, user_agent, is_deleted, deleted_at, deleted_by";

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshToken entity
    fn row_to_token(row: &MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(db_error("Failed to get user_id"))?;

        Ok(RefreshToken {
            id: parse_uuid(&id, "refresh_tokens.id")?,
            user_id: parse_uuid(&user_id, "refresh_tokens.user_id")?,
            token_hash: row
                .try_get("token_hash")
                .map_err(db_error("Failed to get token_hash"))?,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(db_error("Failed to get issued_at"))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(db_error("Failed to get expires_at"))?,
            revoked: row
                .try_get("revoked")
                .map_err(db_error("Failed to get revoked"))?,
            revoked_at: row
                .try_get("revoked_at")
                .map_err(db_error("Failed to get revoked_at"))?,
            ip_address: row
                .try_get("ip_address")
                .map_err(db_error("Failed to get ip_address"))?,
            user_agent: row
                .try_get("user_agent")
                .map_err(db_error("Failed to get user_agent"))?,
            is_deleted: row
                .try_get("is_deleted")
                .map_err(db_error("Failed to get is_deleted"))?,
            deleted_at: row
                .try_get("deleted_at")
                .map_err(db_error("Failed to get deleted_at"))?,
            deleted_by: row
                .try_get("deleted_by")
                .map_err(db_error("Failed to get deleted_by"))?,
        })
    }

    async fn lock_user(tx: &mut Transaction<'_, MySql>, user_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("SELECT id FROM app_users WHERE id = ? FOR UPDATE")
            .bind(user_id.to_string())
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("Failed to lock user"))?;
        Ok(())
    }

    async fn lock_token(
        tx: &mut Transaction<'_, MySql>,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? AND is_deleted = FALSE FOR UPDATE",
            TOKEN_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("Failed to lock refresh token"))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn mark_revoked(
        tx: &mut Transaction<'_, MySql>,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE, revoked_at = ? WHERE id = ?")
            .bind(now)
            .bind(id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to revoke refresh token"))?;
        Ok(())
    }

    /// Soft-deletes every live row of `user_id`, returning how many
    async fn supersede(
        tx: &mut Transaction<'_, MySql>,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET is_deleted = TRUE, deleted_at = ?, deleted_by = ?
            WHERE user_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(at)
        .bind(SYSTEM_ACTOR)
        .bind(user_id.to_string())
        .execute(&mut **tx)
        .await
        .map_err(db_error("Failed to supersede refresh tokens"))?;

        Ok(result.rows_affected())
    }

    async fn insert(
        tx: &mut Transaction<'_, MySql>,
        token: &RefreshToken,
    ) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_hash, issued_at, expires_at, revoked, revoked_at,
                ip_address, user_agent, is_deleted, deleted_at, deleted_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(token.issued_at)
            .bind(token.expires_at)
            .bind(token.revoked)
            .bind(token.revoked_at)
            .bind(&token.ip_address)
            .bind(&token.user_agent)
            .bind(token.is_deleted)
            .bind(token.deleted_at)
            .bind(&token.deleted_by)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::internal("Duplicate refresh token digest")
                } else {
                    db_error("Failed to insert refresh token")(e)
                }
            })?;

        Ok(())
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        Self::lock_user(&mut tx, token.user_id).await?;
        let superseded = Self::supersede(&mut tx, token.user_id, token.issued_at).await?;
        Self::insert(&mut tx, &token).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit refresh token"))?;

        tracing::debug!(user_id = %token.user_id, superseded, "Refresh token stored");
        Ok(token)
    }

    async fn find_active(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? AND is_deleted = FALSE",
            TOKEN_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find refresh token"))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn rotate(
        &self,
        token_hash: &str,
        replacement: RefreshToken,
        now: DateTime<Utc>,
    ) -> Result<(RefreshToken, RefreshToken), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        // User row before token row, as in create and revoke_all_for_user
        Self::lock_user(&mut tx, replacement.user_id).await?;

        let mut consumed = Self::lock_token(&mut tx, token_hash)
            .await?
            .filter(|t| t.user_id == replacement.user_id)
            .ok_or(RefreshRejection::NotFound)?;
        consumed.ensure_usable(now)?;

        Self::mark_revoked(&mut tx, consumed.id, now).await?;
        Self::supersede(&mut tx, replacement.user_id, now).await?;
        Self::insert(&mut tx, &replacement).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit token rotation"))?;

        consumed.revoke(now);
        tracing::debug!(
            user_id = %replacement.user_id,
            previous = %consumed.id,
            "Refresh token rotated"
        );
        Ok((consumed, replacement))
    }

    async fn revoke(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let Some(token) = Self::lock_token(&mut tx, token_hash).await? else {
            return Ok(false);
        };

        if !token.revoked {
            Self::mark_revoked(&mut tx, token.id, now).await?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit refresh token"))?;
        Ok(true)
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        Self::lock_user(&mut tx, user_id).await?;

        let affected = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE, revoked_at = COALESCE(revoked_at, ?),
                is_deleted = TRUE, deleted_at = ?, deleted_by = ?
            WHERE user_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(SYSTEM_ACTOR)
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to revoke user tokens"))?
        .rows_affected();

        tx.commit()
            .await
            .map_err(db_error("Failed to commit revocation"))?;

        Ok(affected as usize)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let affected = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET is_deleted = TRUE, deleted_at = ?, deleted_by = ?
            WHERE is_deleted = FALSE AND expires_at < ?
            "#,
        )
        .bind(now)
        .bind(SYSTEM_ACTOR)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to sweep expired tokens"))?
        .rows_affected();

        Ok(affected as usize)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE user_id = ? AND is_deleted = FALSE \
             ORDER BY issued_at DESC",
            TOKEN_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list refresh tokens"))?;

        rows.iter().map(Self::row_to_token).collect()
    }
}
