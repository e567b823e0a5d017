use skywatch_gateway::GatewayError;
use skywatch_ports::TransportError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the runner and the `skywatch` binary
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] TransportError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
