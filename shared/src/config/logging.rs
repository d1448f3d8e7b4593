//! Log filter configuration consumed by env_logger at start-up

use serde::{Deserialize, Serialize};
use std::env;

use super::Environment;

/// Log filter used when `RUST_LOG` is not set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// env_logger directive, e.g. `info` or `ak_core=debug,info`
    pub filter: String,
}

impl LoggingConfig {
    /// Filter for `environment`, overridden by `LOG_LEVEL` when set
    pub fn from_env(environment: Environment) -> Self {
        let filter = env::var("LOG_LEVEL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| Self::default_filter(environment).to_string());
        Self { filter }
    }

    /// Token and request events at debug while developing, info elsewhere
    pub fn default_filter(environment: Environment) -> &'static str {
        if environment.is_development() {
            "debug,actix_server=info,sqlx=warn"
        } else {
            "info,sqlx=warn"
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(Environment::default()).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_by_environment() {
        assert!(LoggingConfig::default_filter(Environment::Development).starts_with("debug"));
        assert!(LoggingConfig::default_filter(Environment::Staging).starts_with("info"));
        assert!(LoggingConfig::default_filter(Environment::Production).starts_with("info"));
    }

    #[test]
    fn test_default_matches_development() {
        assert_eq!(
            LoggingConfig::default().filter,
            LoggingConfig::default_filter(Environment::Development)
        );
    }
}
