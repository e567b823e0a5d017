use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::values::lenient;

/// Timestamp layouts written by the sensor nodes, tried in order
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

/// One telemetry or forecast data point
///
/// Immutable once received: a newer collection snapshot replaces it whole.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSample {
    /// Relative humidity in percent
    #[serde(deserialize_with = "lenient::integer")]
    pub humidity: i32,
    /// Whether the light sensor reports daylight
    #[serde(deserialize_with = "lenient::boolean")]
    pub light: bool,
    #[serde(deserialize_with = "lenient::integer")]
    pub rainfall: i32,
    /// Temperature in degrees Celsius
    #[serde(deserialize_with = "lenient::float")]
    pub temperature: f64,
    /// Sample time as written by the sensor node (free-form)
    #[serde(deserialize_with = "lenient::text")]
    pub timestamp: String,
}

impl WeatherSample {
    pub fn new(
        humidity: i32,
        light: bool,
        rainfall: i32,
        temperature: f64,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            humidity,
            light,
            rainfall,
            temperature,
            timestamp: timestamp.into(),
        }
    }

    /// Interpret the free-form timestamp, if it uses a known layout
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
