//! Skywatch Runner - Telemetry dashboard
//!
//! Wires the dashboard together:
//!
//! - **Config**: JSON configuration with an embedded default
//! - **Bootstrap**: Backend selection, gateway and view store construction
//! - **Telemetry Feed**: Simulated sensor node for the in-memory backend
//! - **Dashboard**: Presentation model rendered by the `skywatch` binary
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐        ┌──────────────────────┐
//! │ Telemetry Feed  │ writes │ MemoryStore          │
//! │ (simulated)     ├───────►│   or FirebaseStore   │
//! └─────────────────┘        └──────────┬───────────┘
//!                                       │ listeners / reads / writes
//!                            ┌──────────▼───────────┐
//!                            │  RemoteDataGateway   │
//!                            └──────────┬───────────┘
//!                                       │
//!                            ┌──────────▼───────────┐
//!                            │   ViewStateStore     │
//!                            └──────────┬───────────┘
//!                                       │ watch receivers
//!                            ┌──────────▼───────────┐
//!                            │   DashboardView      │
//!                            └──────────────────────┘
//! ```

pub mod bootstrap;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod telemetry_feed;

// Re-export main types
pub use bootstrap::{Backend, DashboardBootstrap};
pub use config::{ConfigError, SkywatchConfig};
pub use dashboard::{DashboardView, ForecastPager, Icon, forecast_pages, icon_for};
pub use error::RunnerError;
pub use telemetry_feed::{TelemetryFeed, TelemetryFeedConfig};
