//! Role entity and role-name normalization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix carried by every role name inside access tokens
pub const ROLE_PREFIX: &str = "ROLE_";

/// A named permission group that accounts can hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier for the role
    pub id: Uuid,

    /// Role name as stored (e.g. `USER`, `ADMIN`)
    pub name: String,

    /// Human readable description
    pub description: Option<String>,
}

impl Role {
    /// Creates a new role with a fresh identifier
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
        }
    }
}

/// Prefixes a role name with `ROLE_` unless it already carries the prefix.
///
/// Applied when claims are minted and again when a route checks a role, so
/// `"ADMIN"` and `"ROLE_ADMIN"` always compare equal.
pub fn normalize_role(name: &str) -> String {
    if name.starts_with(ROLE_PREFIX) {
        name.to_string()
    } else {
        format!("{}{}", ROLE_PREFIX, name)
    }
}
