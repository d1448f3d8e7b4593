//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and schema set-up
//! - Repository implementations for accounts, roles and refresh tokens

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlAccountRepository, MySqlRefreshTokenRepository, MySqlRoleRepository};
