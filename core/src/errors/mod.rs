//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, RefreshRejection, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Shorthand for an internal failure carrying a diagnostic message
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// The refresh-token rejection reason, if this error is one
    pub fn refresh_rejection(&self) -> Option<RefreshRejection> {
        match self {
            DomainError::Token(TokenError::InvalidRefreshToken { reason }) => Some(*reason),
            _ => None,
        }
    }
}

impl From<RefreshRejection> for DomainError {
    fn from(reason: RefreshRejection) -> Self {
        DomainError::Token(reason.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
