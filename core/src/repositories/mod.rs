pub mod account;
pub mod role;
pub mod token;

pub use account::{AccountRepository, InMemoryAccountRepository};
pub use role::{InMemoryRoleRepository, RoleRepository};
pub use token::{InMemoryRefreshTokenRepository, RefreshTokenRepository};
