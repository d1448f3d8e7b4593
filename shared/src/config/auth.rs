//! Authentication and session-token configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT access token and refresh token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign access tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: default_issuer(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Periodic expiry sweep configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweepConfig {
    /// Seconds between sweep runs
    pub interval_seconds: u64,

    /// Whether the background sweep runs at all
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 86400, // once a day
            enabled: true,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Expiry sweep configuration
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Role granted to newly registered accounts
    #[serde(default = "default_role")]
    pub default_role: String,

    /// bcrypt work factor for password hashes
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            sweep: SweepConfig::default(),
            default_role: default_role(),
            password_hash_cost: default_password_hash_cost(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        let sweep = SweepConfig {
            interval_seconds: env_or("TOKEN_SWEEP_INTERVAL", 86400),
            enabled: env_or("TOKEN_SWEEP_ENABLED", true),
        };

        Self {
            jwt,
            sweep,
            default_role: std::env::var("DEFAULT_ROLE").unwrap_or_else(|_| default_role()),
            password_hash_cost: env_or("PASSWORD_HASH_COST", default_password_hash_cost()),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_issuer() -> String {
    String::from("authkeep")
}

fn default_role() -> String {
    String::from("USER")
}

fn default_password_hash_cost() -> u32 {
    12
}
