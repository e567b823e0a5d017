//! Error types for the gateway crate

use skywatch_ports::TransportError;
use thiserror::Error;

/// A remote record did not have the expected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Record {key} is not an object")]
    NotAnObject { key: String },

    #[error("Record {key} has invalid fields: {reason}")]
    InvalidFields { key: String, reason: String },

    #[error("Value at {key} is not a boolean")]
    NotABoolean { key: String },
}

/// Gateway-level errors
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// Listener cancelled or read failed in the backing store
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The store rejected an actuator write
    #[error("Remote write to {path} rejected: {source}")]
    RemoteWrite {
        path: String,
        #[source]
        source: TransportError,
    },
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
