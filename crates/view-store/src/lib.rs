//! Skywatch View State Store
//!
//! Holds the latest known telemetry state and exposes it reactively:
//! - **Weather samples**: fed by the `weather_data` subscription
//! - **Current conditions**: fed by the `current_data` listener
//! - **Forecast samples**: fed by the `forecasting_data` listener
//! - **Actuator commands**: forwarded to the gateway, never cached here
//!
//! ## Architecture
//!
//! ```text
//! RemoteDataGateway ──► subscription task ──► watch: weather_samples ──┐
//!        │                                                             │
//!        ├──────────► current callback ─────► watch: current_conditions├──► observers
//!        │                                                             │
//!        └──────────► forecast callback ────► watch: forecast_samples ─┘
//!
//! set_actuator_state / toggle_actuator ──► RemoteDataGateway (spawned write)
//! ```
//!
//! Every push replaces its field wholesale. Observers see the most recent
//! value as soon as they subscribe.

pub mod store;

pub use store::{ViewStateStore, WriteTicket};
