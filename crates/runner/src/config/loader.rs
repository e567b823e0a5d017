use std::path::Path;
use thiserror::Error;

use super::types::{BackendKind, SkywatchConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Backend {0:?} requires a database_url")]
    MissingDatabaseUrl(BackendKind),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Load dashboard configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SkywatchConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: SkywatchConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<SkywatchConfig, ConfigError> {
    let config: SkywatchConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<SkywatchConfig, ConfigError> {
    let default_config = include_str!("default_config.json");
    load_config_from_str(default_config)
}

impl SkywatchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.kind == BackendKind::Firebase && self.backend.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl(self.backend.kind));
        }
        if self.backend.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.request_timeout_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.feed.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.tick_interval_ms",
                reason: "must be positive".to_string(),
            });
        }
        if self.feed.weather_history == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.weather_history",
                reason: "must keep at least one reading".to_string(),
            });
        }
        if self.feed.forecast_history == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.forecast_history",
                reason: "must keep at least one sample".to_string(),
            });
        }
        if self.dashboard.forecast_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.forecast_pages",
                reason: "must show at least one page".to_string(),
            });
        }
        Ok(())
    }
}
