//! Authentication service module
//!
//! - Credential verification against stored password digests
//! - Registration with the default role
//! - Login, refresh, logout and password change on top of the token lifecycle

mod config;
mod credentials;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use credentials::CredentialVerifier;
pub use password::{BcryptPasswordHasher, PasswordHasher};
pub use service::AuthService;
