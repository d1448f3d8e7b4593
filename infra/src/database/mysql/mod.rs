//! MySQL repository implementations.

mod account_repository_impl;
mod role_repository_impl;
mod token_repository_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use role_repository_impl::MySqlRoleRepository;
pub use token_repository_impl::MySqlRefreshTokenRepository;

use ak_core::errors::DomainError;
use uuid::Uuid;

/// Maps a SQLx failure to an internal domain error with context
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

/// Parses a CHAR(36) identifier column
pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", column, e),
    })
}

/// Whether the error is a unique-key violation
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
