//! Configuration for the authentication service

use ak_shared::config::AuthConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Role granted to every newly registered account
    pub default_role: String,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            default_role: config.default_role.clone(),
        }
    }
}
