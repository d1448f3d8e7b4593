//! In-memory implementation of RoleRepository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::Role;
use crate::errors::DomainError;

use super::r#trait::RoleRepository;

/// Role repository backed by a map keyed on role name
#[derive(Clone, Default)]
pub struct InMemoryRoleRepository {
    roles: Arc<RwLock<HashMap<String, Role>>>,
}

impl InMemoryRoleRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the `USER` and `ADMIN` roles
    pub fn with_default_roles() -> Self {
        let roles = [
            Role::new("USER", Some("Standard user".to_string())),
            Role::new("ADMIN", Some("Administrator".to_string())),
        ]
        .into_iter()
        .map(|r| (r.name.clone(), r))
        .collect();

        Self {
            roles: Arc::new(RwLock::new(roles)),
        }
    }

    /// Adds or replaces a role
    pub async fn insert(&self, role: Role) {
        self.roles.write().await.insert(role.name.clone(), role);
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        Ok(self.roles.read().await.get(name).cloned())
    }
}
