//! Field decoders shared by the remote record types.
//!
//! A `null` (or missing, together with `#[serde(default)]`) field decodes to
//! the field's default. Any other type mismatch is an error, which rejects
//! the whole record.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

/// Any JSON number, as written by the remote store
#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Unsigned(u64),
    Float(f64),
}

/// Decode an integer field. Non-integral numbers are truncated toward zero.
pub(crate) fn integer<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Number::Int(value)) => i32::try_from(value)
            .map_err(|_| D::Error::custom(format!("integer {} out of range", value))),
        Some(Number::Unsigned(value)) => i32::try_from(value)
            .map_err(|_| D::Error::custom(format!("integer {} out of range", value))),
        Some(Number::Float(value)) => {
            let truncated = value.trunc();
            if truncated.is_finite()
                && truncated >= f64::from(i32::MIN)
                && truncated <= f64::from(i32::MAX)
            {
                Ok(truncated as i32)
            } else {
                Err(D::Error::custom(format!("number {} out of range", value)))
            }
        }
    }
}

/// Decode a floating point field from any JSON number
pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Number>::deserialize(deserializer)? {
        None => 0.0,
        Some(Number::Int(value)) => value as f64,
        Some(Number::Unsigned(value)) => value as f64,
        Some(Number::Float(value)) => value,
    })
}

pub(crate) fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
