//! Domain entities representing core business objects.

pub mod account;
pub mod role;
pub mod token;

// Re-export commonly used types
pub use account::{normalize_username, Account};
pub use role::{normalize_role, Role, ROLE_PREFIX};
pub use token::{AccessTokenClaims, RefreshToken, RefreshTokenState, SYSTEM_ACTOR};
