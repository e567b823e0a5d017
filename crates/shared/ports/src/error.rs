use thiserror::Error;

/// Failures reported by the real-time store transport
///
/// Cloneable so that a single cancellation can be handed to every listener
/// registered on the affected path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication revoked")]
    AuthRevoked,

    #[error("Disconnected: {0}")]
    Disconnected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;
