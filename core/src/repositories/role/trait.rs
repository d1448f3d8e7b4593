//! Role repository trait.

use async_trait::async_trait;

use crate::domain::entities::Role;
use crate::errors::DomainError;

/// Read access to role records
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find a role by its exact name
    ///
    /// # Returns
    /// * `Ok(Some(Role))` - Role found
    /// * `Ok(None)` - No such role
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError>;
}
