//! Record parsers: remote snapshots to typed domain records
//!
//! - Collections: each child is decoded on its own; malformed children are
//!   dropped and their well-formed siblings kept, in child order.
//! - Single records: a malformed or absent record becomes the zero-valued
//!   default.
//! - Switches: anything other than a boolean reads as `false`.

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use skywatch_core::{CurrentConditions, ForecastCollection, WeatherSample};
use skywatch_ports::DataSnapshot;

use crate::error::ParseError;

/// Decode one record. The value must be a JSON object.
pub fn parse_record<T: DeserializeOwned>(snapshot: &DataSnapshot) -> Result<T, ParseError> {
    let key = snapshot.key().unwrap_or("/").to_string();

    if !snapshot.value().is_object() {
        return Err(ParseError::NotAnObject { key });
    }

    serde_json::from_value(snapshot.value().clone()).map_err(|e| ParseError::InvalidFields {
        key,
        reason: e.to_string(),
    })
}

pub fn parse_sample(snapshot: &DataSnapshot) -> Result<WeatherSample, ParseError> {
    parse_record(snapshot)
}

/// Decode every child into a sample, skipping the ones that fail
pub fn parse_collection(snapshot: &DataSnapshot) -> ForecastCollection {
    let children = snapshot.children();
    let total = children.len();

    let collection: ForecastCollection = children
        .iter()
        .filter_map(|child| match parse_sample(child) {
            Ok(sample) => Some(sample),
            Err(e) => {
                debug!(
                    "Dropping malformed record under {}: {}",
                    snapshot.key().unwrap_or("/"),
                    e
                );
                None
            }
        })
        .collect();

    if collection.len() < total {
        debug!(
            "Parsed {} of {} records under {}",
            collection.len(),
            total,
            snapshot.key().unwrap_or("/")
        );
    }

    collection
}

/// Decode the current conditions, falling back to the default record
pub fn parse_current(snapshot: &DataSnapshot) -> CurrentConditions {
    if !snapshot.exists() {
        return CurrentConditions::default();
    }

    parse_record(snapshot).unwrap_or_else(|e| {
        debug!("Substituting default current conditions: {}", e);
        CurrentConditions::default()
    })
}

/// Strict boolean read
pub fn parse_bool(snapshot: &DataSnapshot) -> Result<bool, ParseError> {
    match snapshot.value() {
        Value::Bool(on) => Ok(*on),
        _ => Err(ParseError::NotABoolean {
            key: snapshot.key().unwrap_or("/").to_string(),
        }),
    }
}

/// Switch read: absent or non-boolean values are `false`
pub fn parse_switch(snapshot: &DataSnapshot) -> bool {
    parse_bool(snapshot).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_drops_malformed_children() {
        let snapshot = DataSnapshot::at(
            "forecasting_data",
            json!({
                "-N1": {"humidity": 60, "light": true, "rainfall": 0, "temperature": 21.5, "timestamp": "t1"},
                "-N2": {"humidity": "wet"},
                "-N3": 42,
                "-N4": {"humidity": 65, "temperature": 20, "timestamp": "t4"}
            }),
        );

        let collection = parse_collection(&snapshot);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.samples()[0].timestamp, "t1");
        assert_eq!(collection.samples()[1].timestamp, "t4");
        assert_eq!(collection.samples()[1].temperature, 20.0);
    }

    #[test]
    fn test_collection_of_absent_path_is_empty() {
        let snapshot = DataSnapshot::at("weather_data", Value::Null);
        assert!(parse_collection(&snapshot).is_empty());
    }

    #[test]
    fn test_array_shaped_record_rejected() {
        let snapshot = DataSnapshot::at("current_data", json!([60, true, 0, 21.5, "t"]));
        assert!(matches!(
            parse_record::<WeatherSample>(&snapshot),
            Err(ParseError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_current_falls_back_to_default() {
        let malformed = DataSnapshot::at("current_data", json!({"temperature": "hot"}));
        assert_eq!(parse_current(&malformed), CurrentConditions::default());

        let absent = DataSnapshot::at("current_data", Value::Null);
        assert_eq!(parse_current(&absent), CurrentConditions::default());

        let good = DataSnapshot::at(
            "current_data",
            json!({"temperature": 25.0, "weather_name": "sunny"}),
        );
        let current = parse_current(&good);
        assert_eq!(current.temperature, 25.0);
        assert_eq!(current.weather_category, "sunny");
    }

    #[test]
    fn test_switch_defaults_to_false() {
        assert!(parse_switch(&DataSnapshot::at("aktuator/led", json!(true))));
        assert!(!parse_switch(&DataSnapshot::at("aktuator/led", json!(false))));
        assert!(!parse_switch(&DataSnapshot::at("aktuator/led", Value::Null)));
        assert!(!parse_switch(&DataSnapshot::at("aktuator/led", json!("true"))));
        assert!(!parse_switch(&DataSnapshot::at("aktuator/led", json!(1))));
    }
}
