//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing, lifetimes and the expiry sweep
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection
//! - `logging` - Log filter handed to env_logger
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod logging;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, SweepConfig};
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use logging::LoggingConfig;
pub use server::ServerConfig;

/// Work factors bcrypt accepts
const BCRYPT_COSTS: std::ops::RangeInclusive<u32> = 4..=31;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Check settings that must never reach production unchanged
    pub fn validate(&self) -> Result<(), String> {
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err("JWT_SECRET must be set in production".to_string());
        }
        if self.auth.jwt.access_token_expiry <= 0 || self.auth.jwt.refresh_token_expiry <= 0 {
            return Err("Token lifetimes must be positive".to_string());
        }
        if !BCRYPT_COSTS.contains(&self.auth.password_hash_cost) {
            return Err(format!(
                "PASSWORD_HASH_COST must be between {} and {}, got {}",
                BCRYPT_COSTS.start(),
                BCRYPT_COSTS.end(),
                self.auth.password_hash_cost
            ));
        }
        Ok(())
    }
}
