use std::env;

use ak_shared::config::AppConfig;

/// Where accounts and refresh tokens are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    /// Process-local maps; everything is lost on restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Invalid storage backend: {}", other)),
        }
    }
}

/// Configuration of the API binary
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let app = AppConfig::from_env();
        app.validate()?;

        let storage = env::var("AUTHKEEP_STORAGE")
            .unwrap_or_else(|_| "mysql".to_string())
            .parse()?;

        Ok(Config { app, storage })
    }

    pub fn is_production(&self) -> bool {
        self.app.environment.is_production()
    }

    /// env_logger settings: `RUST_LOG` when set, else the configured filter
    pub fn logger_env(&self) -> env_logger::Env<'_> {
        env_logger::Env::new().default_filter_or(self.app.logging.filter.as_str())
    }
}
