//! MySQL implementation of the AccountRepository trait.
//!
//! Accounts live in `app_users`; role membership in `app_user_roles`.
//! Every lookup filters out soft-deleted rows.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use ak_core::domain::entities::Account;
use ak_core::errors::{AuthError, DomainError};
use ak_core::repositories::AccountRepository;

use super::{db_error, is_unique_violation, parse_uuid};

const ACCOUNT_COLUMNS: &str = "id, username, password_hash, full_name, enabled, \
     created_at, updated_at, is_deleted, deleted_at, deleted_by";

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a new MySQL account repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an Account, attaching its roles
    fn row_to_account(row: &MySqlRow, roles: BTreeSet<String>) -> Result<Account, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;

        Ok(Account {
            id: parse_uuid(&id, "app_users.id")?,
            username: row
                .try_get("username")
                .map_err(db_error("Failed to get username"))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(db_error("Failed to get password_hash"))?,
            full_name: row
                .try_get("full_name")
                .map_err(db_error("Failed to get full_name"))?,
            enabled: row
                .try_get("enabled")
                .map_err(db_error("Failed to get enabled"))?,
            roles,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_error("Failed to get created_at"))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(db_error("Failed to get updated_at"))?,
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

    async fn load_roles(&self, user_id: &str) -> Result<BTreeSet<String>, DomainError> {
        let query = r#"
            SELECT r.name
            FROM app_roles r
            JOIN app_user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = ?
        "#;

        let names: Vec<String> = sqlx::query_scalar(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load roles"))?;

        Ok(names.into_iter().collect())
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM app_users WHERE {} = ? AND is_deleted = FALSE LIMIT 1",
            ACCOUNT_COLUMNS, column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find account"))?;

        match row {
            Some(row) => {
                let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;
                let roles = self.load_roles(&id).await?;
                Ok(Some(Self::row_to_account(&row, roles)?))
            }
            None => Ok(None),
        }
    }

    /// Replace the role assignments of `user_id` inside `tx`
    async fn assign_roles(
        tx: &mut Transaction<'_, MySql>,
        user_id: Uuid,
        roles: &BTreeSet<String>,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM app_user_roles WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to clear roles"))?;

        for name in roles {
            let result = sqlx::query(
                "INSERT INTO app_user_roles (user_id, role_id) \
                 SELECT ?, id FROM app_roles WHERE name = ?",
            )
            .bind(user_id.to_string())
            .bind(name)
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to assign role"))?;

            if result.rows_affected() == 0 {
                return Err(AuthError::RoleNotFound { name: name.clone() }.into());
            }
        }

        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        self.find_one("id", &id.to_string()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        self.find_one("username", username).await
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM app_users WHERE username = ? AND is_deleted = FALSE",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check username"))?;

        Ok(count > 0)
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let query = r#"
            INSERT INTO app_users (
                id, username, password_hash, full_name, enabled,
                created_at, updated_at, is_deleted, deleted_at, deleted_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.username)
            .bind(&account.password_hash)
            .bind(&account.full_name)
            .bind(account.enabled)
            .bind(account.created_at)
            .bind(account.updated_at)
            .bind(account.is_deleted)
            .bind(account.deleted_at)
            .bind(&account.deleted_by)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Auth(AuthError::AlreadyExists {
                        username: account.username.clone(),
                    })
                } else {
                    db_error("Failed to insert account")(e)
                }
            })?;

        Self::assign_roles(&mut tx, account.id, &account.roles).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit account"))?;

        tracing::debug!(user_id = %account.id, "Account row inserted");
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT id FROM app_users WHERE id = ? AND is_deleted = FALSE FOR UPDATE",
        )
        .bind(account.id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock account"))?;

        if existing.is_none() {
            return Err(AuthError::AccountNotFound.into());
        }

        let query = r#"
            UPDATE app_users
            SET password_hash = ?, full_name = ?, enabled = ?, updated_at = ?,
                is_deleted = ?, deleted_at = ?, deleted_by = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(&account.password_hash)
            .bind(&account.full_name)
            .bind(account.enabled)
            .bind(account.updated_at)
            .bind(account.is_deleted)
            .bind(account.deleted_at)
            .bind(&account.deleted_by)
            .bind(account.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to update account"))?;

        Self::assign_roles(&mut tx, account.id, &account.roles).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit account"))?;

        Ok(account)
    }
}
