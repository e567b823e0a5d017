//! Skywatch Gateway
//!
//! Remote data gateway for the Skywatch telemetry dashboard. Provides:
//! - Fixed remote paths for telemetry and actuator data
//! - Record parsers (malformed collection children are dropped, malformed
//!   single records fall back to defaults)
//! - Listener handles that release their registration exactly once
//! - A cancellable stream of forecast collections
//! - Store adapters (in-memory, hosted database over REST + event stream)
//!
//! ## Architecture
//!
//! ```text
//! Hosted real-time store (or MemoryStore)
//!         │ value listeners / one-shot reads / child updates
//!    ┌────▼─────────────┐
//!    │ RemoteDataGateway│  parsers: snapshot -> typed records
//!    └────┬─────────────┘
//!         │ callbacks, ForecastSubscription, write results
//!    ┌────▼────┐
//!    │  View   │
//!    │  State  │
//!    └─────────┘
//! ```
//!
//! The store is injected as `Arc<dyn RealtimeStore>`; nothing here binds to
//! a global database instance.

pub mod adapters;
pub mod error;
pub mod gateway;
pub mod handle;
pub mod parsers;
pub mod paths;
pub mod subscription;

// Re-export commonly used types
pub use adapters::{FirebaseConfig, FirebaseStore, MemoryStore, WriteRecord};
pub use error::{GatewayError, GatewayResult, ParseError};
pub use gateway::RemoteDataGateway;
pub use handle::ListenerHandle;
pub use subscription::ForecastSubscription;
