//! Bootstrap - Backend selection and dashboard setup
//!
//! Handles initial setup of the dashboard:
//! - Building the configured real-time store
//! - Starting the simulated sensor node for the in-memory backend
//! - Injecting the store into the gateway and starting the view store

use log::info;
use skywatch_gateway::{FirebaseStore, MemoryStore, RemoteDataGateway};
use skywatch_ports::RealtimeStore;
use skywatch_view_store::ViewStateStore;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::{BackendKind, SkywatchConfig};
use crate::dashboard::DashboardView;
use crate::error::RunnerError;
use crate::telemetry_feed::{TelemetryFeed, TelemetryFeedConfig};

/// The store behind the gateway
#[derive(Clone)]
pub enum Backend {
    Simulated(Arc<MemoryStore>),
    Firebase(Arc<FirebaseStore>),
}

impl Backend {
    pub fn from_config(config: &SkywatchConfig) -> Result<Self, RunnerError> {
        match config.backend.kind {
            BackendKind::Simulated => Ok(Backend::Simulated(Arc::new(MemoryStore::new()))),
            BackendKind::Firebase => {
                let store = FirebaseStore::new(config.backend.to_firebase_config())?;
                Ok(Backend::Firebase(Arc::new(store)))
            }
        }
    }

    pub fn store(&self) -> Arc<dyn RealtimeStore> {
        match self {
            Backend::Simulated(store) => Arc::clone(store) as Arc<dyn RealtimeStore>,
            Backend::Firebase(store) => Arc::clone(store) as Arc<dyn RealtimeStore>,
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Simulated(_) => BackendKind::Simulated,
            Backend::Firebase(_) => BackendKind::Firebase,
        }
    }
}

/// Running dashboard: backend, gateway, view store and optional feed
pub struct DashboardBootstrap {
    pub config: SkywatchConfig,
    pub backend: Backend,
    pub gateway: Arc<RemoteDataGateway>,
    pub view: ViewStateStore,
    feed_task: Option<JoinHandle<()>>,
}

impl DashboardBootstrap {
    /// Build everything from configuration
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: SkywatchConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let backend = Backend::from_config(&config)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Build around an existing backend
    pub fn with_backend(config: SkywatchConfig, backend: Backend) -> Self {
        let feed_task = match &backend {
            Backend::Simulated(store) => Some(spawn_feed(&config, Arc::clone(store))),
            Backend::Firebase(_) => None,
        };

        let gateway = Arc::new(RemoteDataGateway::new(backend.store()));
        let view = ViewStateStore::new(Arc::clone(&gateway));
        info!("Dashboard started on {:?} backend", backend.kind());

        Self {
            config,
            backend,
            gateway,
            view,
            feed_task,
        }
    }

    /// Empty view model sized for the configured page count
    pub fn new_view(&self) -> DashboardView {
        DashboardView::new(self.config.dashboard.forecast_pages)
    }

    /// Stop the feed and release every remote listener. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.feed_task.take() {
            task.abort();
        }
        self.view.shutdown();
    }
}

impl Drop for DashboardBootstrap {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_feed(config: &SkywatchConfig, store: Arc<MemoryStore>) -> JoinHandle<()> {
    let feed_config = TelemetryFeedConfig {
        weather_history: config.feed.weather_history,
        forecast_history: config.feed.forecast_history,
        ..TelemetryFeedConfig::default()
    };
    let mut feed = match config.feed.seed {
        Some(seed) => TelemetryFeed::with_seed(feed_config, seed),
        None => TelemetryFeed::new(feed_config),
    };
    let interval = config.feed.tick_interval();

    tokio::spawn(async move {
        feed.run(&store, interval).await;
    })
}
