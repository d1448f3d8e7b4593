//! MySQL implementation of the RoleRepository trait.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use ak_core::domain::entities::Role;
use ak_core::errors::DomainError;
use ak_core::repositories::RoleRepository;

use super::{db_error, parse_uuid};

/// MySQL implementation of RoleRepository
pub struct MySqlRoleRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRoleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for MySqlRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let query = r#"
            SELECT id, name, description
            FROM app_roles
            WHERE name = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find role"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;

        Ok(Some(Role {
            id: parse_uuid(&id, "app_roles.id")?,
            name: row.try_get("name").map_err(db_error("Failed to get name"))?,
            description: row
                .try_get("description")
                .map_err(db_error("Failed to get description"))?,
        }))
    }
}
