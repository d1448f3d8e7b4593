//! # Authkeep Core
//!
//! Domain layer for the Authkeep credential and session-token service.
//! This crate contains the domain entities, the error taxonomy, repository
//! interfaces (with in-memory implementations), and the services that mint
//! access tokens and drive the refresh-token lifecycle.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
