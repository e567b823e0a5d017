//! Skywatch Core Domain
//!
//! Pure domain records for the Skywatch telemetry dashboard.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! Every record is replaced whole on update. The lenient decoding rules
//! used for remote records (missing or `null` fields fall back to their
//! defaults, wrong types reject the record) are attached to the types
//! through serde, so any adapter decoding a JSON record gets them for free.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{ActuatorState, CurrentConditions, ForecastCollection, WeatherSample};
pub use values::{FORECAST_PAGE_LIMIT, WeatherCategory};
