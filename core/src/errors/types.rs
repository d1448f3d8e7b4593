//! Error types for credential checks and token handling
//!
//! Display strings are generic and safe to surface at the
//! HTTP boundary. Diagnostic detail (such as why a refresh token was
//! rejected) travels in fields that are only logged.

use std::fmt;

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown user, disabled user or wrong password. Never distinguished.
    #[error("Bad credentials")]
    BadCredentials,

    #[error("Current password is incorrect")]
    InvalidPassword,

    #[error("Username already exists: {username}")]
    AlreadyExists { username: String },

    #[error("Account not found")]
    AccountNotFound,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Role not found: {name}")]
    RoleNotFound { name: String },
}

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken { reason: RefreshRejection },

    #[error("Token generation failed")]
    GenerationFailed,

    #[error("Signing secret must be at least {min} bytes")]
    WeakSecret { min: usize },
}

/// Why a refresh token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshRejection {
    NotFound,
    Revoked,
    Expired,
}

impl fmt::Display for RefreshRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshRejection::NotFound => write!(f, "not found"),
            RefreshRejection::Revoked => write!(f, "revoked"),
            RefreshRejection::Expired => write!(f, "expired"),
        }
    }
}

impl From<RefreshRejection> for TokenError {
    fn from(reason: RefreshRejection) -> Self {
        TokenError::InvalidRefreshToken { reason }
    }
}
