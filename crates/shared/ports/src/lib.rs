//! Skywatch Ports
//!
//! Port definitions (traits) for the Skywatch telemetry dashboard.
//! These define the boundary between the gateway and whichever hosted,
//! path-addressed, listener-based real-time store backs it.

mod error;
mod listener;
mod snapshot;
mod store;

pub use error::{TransportError, TransportResult};
pub use listener::{ListenerId, ValueListener};
pub use snapshot::DataSnapshot;
pub use store::{RealtimeStore, normalize_path};
