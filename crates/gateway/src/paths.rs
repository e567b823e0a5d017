//! Remote store paths
//!
//! Fixed, string-keyed, hierarchical locations of the telemetry and actuator
//! data. Kept in one place so logs and adapters agree on naming.

/// Collection of live telemetry samples, consumed as a subscription
pub const WEATHER_DATA: &str = "weather_data";

/// Single record with the current conditions
pub const CURRENT_DATA: &str = "current_data";

/// Collection of forecast samples
pub const FORECASTING_DATA: &str = "forecasting_data";

/// Parent of the actuator outputs
pub const ACTUATOR: &str = "aktuator";

/// Lamp output (also read back as the switch state)
pub const ACTUATOR_LED: &str = "led";

/// Motor output, always written together with the lamp
pub const ACTUATOR_MOTOR: &str = "motor";

/// Full path of the lamp output: `aktuator/led`
pub fn actuator_led() -> String {
    child(ACTUATOR, ACTUATOR_LED)
}

/// Full path of the motor output: `aktuator/motor`
pub fn actuator_motor() -> String {
    child(ACTUATOR, ACTUATOR_MOTOR)
}

/// Join a parent path and a child key
pub fn child(parent: &str, key: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let key = key.trim_start_matches('/');
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", parent, key)
    }
}
