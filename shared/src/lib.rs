//! Shared configuration and common types for the Authkeep server
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types (JWT, token sweep, database, server, logging)
//! - Error response structures
//! - API response envelopes

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig, ServerConfig,
    SweepConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, HealthResponse};
