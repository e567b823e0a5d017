use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::WeatherSample;
use super::weather_sample::parse_timestamp;
use crate::values::{WeatherCategory, lenient};

/// The latest observed conditions
///
/// Same shape as [`WeatherSample`] plus the category label that selects the
/// display icon. Exactly one instance is live at a time and every update
/// replaces it whole.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    #[serde(deserialize_with = "lenient::integer")]
    pub humidity: i32,
    #[serde(deserialize_with = "lenient::boolean")]
    pub light: bool,
    #[serde(deserialize_with = "lenient::integer")]
    pub rainfall: i32,
    #[serde(deserialize_with = "lenient::float")]
    pub temperature: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub timestamp: String,
    /// Category label such as `light_rain`; stored remotely as `weather_name`
    #[serde(rename = "weather_name", deserialize_with = "lenient::text")]
    pub weather_category: String,
}

impl CurrentConditions {
    pub fn new(sample: WeatherSample, weather_category: impl Into<String>) -> Self {
        Self {
            humidity: sample.humidity,
            light: sample.light,
            rainfall: sample.rainfall,
            temperature: sample.temperature,
            timestamp: sample.timestamp,
            weather_category: weather_category.into(),
        }
    }

    /// Parsed category label
    pub fn category(&self) -> WeatherCategory {
        WeatherCategory::from_label(&self.weather_category)
    }

    /// The measurement part, without the category
    pub fn sample(&self) -> WeatherSample {
        WeatherSample {
            humidity: self.humidity,
            light: self.light,
            rainfall: self.rainfall,
            temperature: self.temperature,
            timestamp: self.timestamp.clone(),
        }
    }

    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    /// True for the zero-valued placeholder used before any data arrives
    pub fn is_placeholder(&self) -> bool {
        *self == Self::default()
    }
}
