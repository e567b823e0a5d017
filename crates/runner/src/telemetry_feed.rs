//! Telemetry Feed - Simulated sensor node
//!
//! Stands in for the field station when no hosted store is configured.
//! Each tick:
//! - Random-walks temperature, humidity and rainfall, occasionally flips light
//! - Writes the reading to `current_data` with a derived category
//! - Appends the sample to `weather_data`, keeping only the most recent
//!   `weather_history` entries
//! - Appends a one-hour-ahead forecast to `forecasting_data`, keeping only the
//!   most recent `forecast_history` entries

use chrono::{Duration as ChronoDuration, Local};
use log::{debug, warn};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;
use skywatch_core::{CurrentConditions, WeatherCategory, WeatherSample};
use skywatch_gateway::{MemoryStore, paths};
use skywatch_ports::DataSnapshot;
use std::time::Duration;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Configuration for the simulated sensor node
#[derive(Debug, Clone)]
pub struct TelemetryFeedConfig {
    pub initial_temperature: f64,
    pub initial_humidity: i32,
    /// Max temperature change per tick (°C)
    pub temperature_step: f64,
    /// Max humidity change per tick (percentage points)
    pub humidity_step: i32,
    /// Probability of a rain burst per tick (0.0 to 1.0)
    pub rain_probability: f64,
    /// Probability of the light sensor flipping per tick
    pub light_flip_probability: f64,
    /// Readings kept in `weather_data`
    pub weather_history: usize,
    /// Forecast samples kept in `forecasting_data`
    pub forecast_history: usize,
}

impl Default for TelemetryFeedConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 22.0,
            initial_humidity: 55,
            temperature_step: 0.4,
            humidity_step: 3,
            rain_probability: 0.1,
            light_flip_probability: 0.05,
            weather_history: 120,
            forecast_history: 24,
        }
    }
}

/// Category shown for a reading
pub fn categorize(rainfall: i32, light: bool, humidity: i32) -> WeatherCategory {
    match rainfall {
        r if r >= 15 => WeatherCategory::HeavyRain,
        r if r >= 5 => WeatherCategory::LightRain,
        r if r > 0 => WeatherCategory::Drizzle,
        _ if humidity >= 85 => WeatherCategory::Overcast,
        _ if !light || humidity >= 70 => WeatherCategory::Cloudy,
        _ => WeatherCategory::Sunny,
    }
}

/// Generates simulated telemetry and writes it into a `MemoryStore`
pub struct TelemetryFeed {
    temperature: f64,
    humidity: i32,
    rainfall: i32,
    light: bool,
    config: TelemetryFeedConfig,
    rng: StdRng,
}

impl TelemetryFeed {
    pub fn new(config: TelemetryFeedConfig) -> Self {
        Self::with_rng(config, rand::SeedableRng::from_entropy())
    }

    /// Create with a specific seed for reproducible runs
    pub fn with_seed(config: TelemetryFeedConfig, seed: u64) -> Self {
        Self::with_rng(config, rand::SeedableRng::seed_from_u64(seed))
    }

    fn with_rng(config: TelemetryFeedConfig, rng: StdRng) -> Self {
        Self {
            temperature: config.initial_temperature,
            humidity: config.initial_humidity,
            rainfall: 0,
            light: true,
            config,
            rng,
        }
    }

    /// Generate the next reading (call this on each tick)
    pub fn next_reading(&mut self) -> CurrentConditions {
        let step = self.config.temperature_step;
        let delta: f64 = self.rng.gen_range(-step..=step);
        self.temperature = round1((self.temperature + delta).clamp(-20.0, 45.0));

        let h = self.config.humidity_step;
        self.humidity = (self.humidity + self.rng.gen_range(-h..=h)).clamp(5, 100);

        let burst: f64 = self.rng.r#gen();
        self.rainfall = if burst < self.config.rain_probability {
            self.rainfall + self.rng.gen_range(1..=12)
        } else {
            (self.rainfall - self.rng.gen_range(0..=3)).max(0)
        };

        let flip: f64 = self.rng.r#gen();
        if flip < self.config.light_flip_probability {
            self.light = !self.light;
        }

        let sample = WeatherSample::new(
            self.humidity,
            self.light,
            self.rainfall,
            self.temperature,
            Local::now().format(TIMESTAMP_FORMAT).to_string(),
        );
        let category = categorize(self.rainfall, self.light, self.humidity);
        CurrentConditions::new(sample, category.label())
    }

    /// One-hour-ahead projection of a reading
    pub fn forecast_for(&mut self, reading: &CurrentConditions) -> WeatherSample {
        let drift: f64 = self.rng.gen_range(-1.5..=1.5);
        let at = Local::now() + ChronoDuration::hours(1);
        WeatherSample::new(
            (reading.humidity + self.rng.gen_range(-5..=5)).clamp(5, 100),
            reading.light,
            reading.rainfall,
            round1(reading.temperature + drift),
            at.format(TIMESTAMP_FORMAT).to_string(),
        )
    }

    /// Generate a reading and publish it
    pub fn tick(&mut self, store: &MemoryStore) -> CurrentConditions {
        let reading = self.next_reading();
        let forecast = self.forecast_for(&reading);

        if let Some(value) = to_value(&reading) {
            store.set(paths::CURRENT_DATA, value);
        }
        if let Some(value) = to_value(&reading.sample()) {
            store.push(paths::WEATHER_DATA, value);
            trim_collection(store, paths::WEATHER_DATA, self.config.weather_history);
        }
        if let Some(value) = to_value(&forecast) {
            store.push(paths::FORECASTING_DATA, value);
            trim_collection(store, paths::FORECASTING_DATA, self.config.forecast_history);
        }

        debug!(
            "Published reading {:.1}°C {}% {} ({})",
            reading.temperature, reading.humidity, reading.rainfall, reading.weather_category
        );
        reading
    }

    /// Run the feed for a specified number of ticks
    pub async fn run_ticks(&mut self, store: &MemoryStore, num_ticks: usize, interval: Duration) {
        for _ in 0..num_ticks {
            self.tick(store);
            tokio::time::sleep(interval).await;
        }
    }

    /// Run continuously until cancelled
    pub async fn run(&mut self, store: &MemoryStore, interval: Duration) {
        loop {
            self.tick(store);
            tokio::time::sleep(interval).await;
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn to_value<T: Serialize>(record: &T) -> Option<serde_json::Value> {
    match serde_json::to_value(record) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to encode telemetry record: {}", e);
            None
        }
    }
}

/// Remove the oldest children of `path` beyond `keep`
fn trim_collection(store: &MemoryStore, path: &str, keep: usize) {
    let children = DataSnapshot::at(path, store.value(path)).children();
    if children.len() <= keep {
        return;
    }

    for child in &children[..children.len() - keep] {
        if let Some(key) = child.key() {
            store.remove(&format!("{}/{}", path, key));
        }
    }
}
