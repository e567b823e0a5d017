use futures_util::StreamExt;
use log::{debug, info, warn};
use parking_lot::Mutex;
use skywatch_core::{CurrentConditions, ForecastCollection};
use skywatch_gateway::{GatewayResult, ListenerHandle, RemoteDataGateway};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Pending actuator write; await it for the outcome or drop it
pub type WriteTicket = JoinHandle<GatewayResult<()>>;

/// Passive cache of the dashboard's telemetry state
///
/// Each field has exactly one writer (its gateway feed). `shutdown()`, or
/// dropping the store, releases every remote listener it acquired.
pub struct ViewStateStore {
    gateway: Arc<RemoteDataGateway>,
    weather_samples: Arc<watch::Sender<ForecastCollection>>,
    current_conditions: Arc<watch::Sender<CurrentConditions>>,
    forecast_samples: Arc<watch::Sender<ForecastCollection>>,
    listeners: Mutex<Vec<ListenerHandle>>,
    subscription_task: Mutex<Option<JoinHandle<()>>>,
}

impl ViewStateStore {
    /// Start all three feeds
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(gateway: Arc<RemoteDataGateway>) -> Self {
        let (weather_tx, _) = watch::channel(ForecastCollection::default());
        let (current_tx, _) = watch::channel(CurrentConditions::default());
        let (forecast_tx, _) = watch::channel(ForecastCollection::default());

        let store = Self {
            gateway,
            weather_samples: Arc::new(weather_tx),
            current_conditions: Arc::new(current_tx),
            forecast_samples: Arc::new(forecast_tx),
            listeners: Mutex::new(Vec::new()),
            subscription_task: Mutex::new(None),
        };

        store.start_weather_feed();
        store.start_current_feed();
        store.start_forecast_feed();
        info!("View state store started");
        store
    }

    fn start_weather_feed(&self) {
        let mut subscription = self.gateway.subscribe_forecast_collection();
        let samples = Arc::clone(&self.weather_samples);

        let task = tokio::spawn(async move {
            while let Some(update) = subscription.next().await {
                match update {
                    Ok(collection) => {
                        samples.send_replace(collection);
                    }
                    Err(e) => warn!("Weather samples stopped updating: {}", e),
                }
            }
            debug!("Weather sample subscription ended");
        });
        *self.subscription_task.lock() = Some(task);
    }

    fn start_current_feed(&self) {
        let current = Arc::clone(&self.current_conditions);
        match self.gateway.fetch_current_conditions(move |conditions| {
            current.send_replace(conditions);
        }) {
            Ok(handle) => self.listeners.lock().push(handle),
            Err(e) => warn!("Current conditions unavailable: {}", e),
        }
    }

    fn start_forecast_feed(&self) {
        let forecast = Arc::clone(&self.forecast_samples);
        match self.gateway.fetch_forecast_collection(move |collection| {
            forecast.send_replace(collection);
        }) {
            Ok(handle) => self.listeners.lock().push(handle),
            Err(e) => warn!("Forecast samples unavailable: {}", e),
        }
    }

    pub fn weather_samples(&self) -> watch::Receiver<ForecastCollection> {
        self.weather_samples.subscribe()
    }

    pub fn current_conditions(&self) -> watch::Receiver<CurrentConditions> {
        self.current_conditions.subscribe()
    }

    pub fn forecast_samples(&self) -> watch::Receiver<ForecastCollection> {
        self.forecast_samples.subscribe()
    }

    pub fn weather_samples_snapshot(&self) -> ForecastCollection {
        self.weather_samples.borrow().clone()
    }

    pub fn current_conditions_snapshot(&self) -> CurrentConditions {
        self.current_conditions.borrow().clone()
    }

    pub fn forecast_samples_snapshot(&self) -> ForecastCollection {
        self.forecast_samples.borrow().clone()
    }

    /// Read the switch once; see `RemoteDataGateway::read_actuator_state`
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_initial_actuator_state<F>(&self, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.gateway.read_actuator_state(on_result)
    }

    /// Write both outputs without touching local state
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_actuator_state(&self, on: bool) -> WriteTicket {
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move { gateway.write_actuator_state(on).await })
    }

    /// Read the switch and write its inverse, resolving to the new value
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    pub fn toggle_actuator(&self) -> JoinHandle<GatewayResult<bool>> {
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            let next = !gateway.actuator_state().await?;
            gateway.write_actuator_state(next).await?;
            Ok(next)
        })
    }

    /// True until `shutdown()` has run
    pub fn is_running(&self) -> bool {
        self.subscription_task.lock().is_some()
    }

    /// Release every listener and stop the subscription task
    pub fn shutdown(&self) {
        let listeners: Vec<ListenerHandle> = self.listeners.lock().drain(..).collect();
        for handle in &listeners {
            handle.cancel();
        }

        if let Some(task) = self.subscription_task.lock().take() {
            // Dropping the task's subscription removes its listener
            task.abort();
            info!("View state store stopped");
        }
    }
}

impl Drop for ViewStateStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}
