use std::fmt;
use uuid::Uuid;

use crate::{DataSnapshot, TransportError};

/// Identifier of one registered value listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback side of a persistent listener
///
/// Implementations must not block: stores call these from their own
/// notification path.
pub trait ValueListener: Send + Sync {
    /// The value at the listened path changed (or was delivered initially)
    fn on_data_change(&self, snapshot: DataSnapshot);

    /// The store cancelled the listener; no further calls follow
    fn on_cancelled(&self, error: TransportError);
}
