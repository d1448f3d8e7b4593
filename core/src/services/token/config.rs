//! Configuration for the token services

use ak_shared::config::JwtConfig;
use chrono::Duration;

/// Signing secret and lifetimes used by the codec and the refresh store
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HMAC secret for HS256
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_ttl_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_seconds: i64,
    /// Value of the `iss` claim
    pub issuer: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.secret.clone(),
            access_token_ttl_seconds: jwt.access_token_expiry,
            refresh_token_ttl_seconds: jwt.refresh_token_expiry,
            issuer: jwt.issuer.clone(),
        }
    }
}

impl TokenServiceConfig {
    pub fn access_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_ttl_seconds)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::seconds(self.refresh_token_ttl_seconds)
    }
}

// Keep the secret out of logs
impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_seconds", &self.refresh_token_ttl_seconds)
            .field("issuer", &self.issuer)
            .finish()
    }
}
