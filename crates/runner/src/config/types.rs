use serde::{Deserialize, Serialize};
use skywatch_core::FORECAST_PAGE_LIMIT;
use skywatch_gateway::FirebaseConfig;
use std::time::Duration;

/// Root configuration for the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkywatchConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Which real-time store backs the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process store fed by the simulated sensor node
    #[default]
    Simulated,
    /// Hosted real-time database
    Firebase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    /// Database root URL (required for `firebase`)
    #[serde(default)]
    pub database_url: String,
    /// Database secret or ID token, sent as the `auth` query parameter
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            kind: BackendKind::default(),
            database_url: String::new(),
            auth_token: None,
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn to_firebase_config(&self) -> FirebaseConfig {
        let config = FirebaseConfig::new(self.database_url.clone())
            .with_request_timeout(self.request_timeout());
        match &self.auth_token {
            Some(token) if !token.is_empty() => config.with_auth_token(token.clone()),
            _ => config,
        }
    }
}

/// Simulated sensor node settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Readings kept in `weather_data`
    #[serde(default = "default_weather_history")]
    pub weather_history: usize,
    /// Forecast samples kept in `forecasting_data`
    #[serde(default = "default_forecast_history")]
    pub forecast_history: usize,
    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            tick_interval_ms: default_tick_interval(),
            weather_history: default_weather_history(),
            forecast_history: default_forecast_history(),
            seed: None,
        }
    }
}

impl FeedConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of most recent forecast samples shown as pages
    #[serde(default = "default_forecast_pages")]
    pub forecast_pages: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            forecast_pages: default_forecast_pages(),
        }
    }
}

// Default value functions for serde
fn default_request_timeout() -> u64 {
    10_000
}

fn default_tick_interval() -> u64 {
    1_000
}

fn default_weather_history() -> usize {
    120
}

fn default_forecast_history() -> usize {
    24
}

fn default_forecast_pages() -> usize {
    FORECAST_PAGE_LIMIT
}
