//! Remote data gateway
//!
//! Typed access to the telemetry paths of the real-time store:
//!
//! | Operation                        | Path               | Mechanism            |
//! |----------------------------------|--------------------|----------------------|
//! | `subscribe_forecast_collection`  | `weather_data`     | stream of collections|
//! | `fetch_current_conditions`       | `current_data`     | persistent callback  |
//! | `fetch_forecast_collection`      | `forecasting_data` | persistent callback  |
//! | `read_actuator_state`            | `aktuator/led`     | one-shot read        |
//! | `write_actuator_state`           | `aktuator`         | one child update     |

use log::{debug, error, info};
use serde_json::{Map, Value};
use skywatch_core::{ActuatorState, CurrentConditions, ForecastCollection};
use skywatch_ports::{DataSnapshot, RealtimeStore, TransportError, ValueListener};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{GatewayError, GatewayResult};
use crate::handle::ListenerHandle;
use crate::parsers;
use crate::paths;
use crate::subscription::{CollectionListener, ForecastSubscription};

/// Listener that hands each snapshot to a closure
struct CallbackListener<F> {
    path: String,
    on_change: F,
}

impl<F> ValueListener for CallbackListener<F>
where
    F: Fn(DataSnapshot) + Send + Sync,
{
    fn on_data_change(&self, snapshot: DataSnapshot) {
        (self.on_change)(snapshot);
    }

    fn on_cancelled(&self, error: TransportError) {
        error!("Error fetching {}: {}", self.path, error);
    }
}

#[derive(Clone)]
pub struct RemoteDataGateway {
    store: Arc<dyn RealtimeStore>,
}

impl RemoteDataGateway {
    pub fn new(store: Arc<dyn RealtimeStore>) -> Self {
        info!("Remote data gateway over {}", store.name());
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RealtimeStore> {
        &self.store
    }

    /// Live telemetry samples as a stream of full collections
    pub fn subscribe_forecast_collection(&self) -> ForecastSubscription {
        self.subscribe_collection(paths::WEATHER_DATA)
    }

    /// Stream of full collections for any collection path
    pub fn subscribe_collection(&self, path: &str) -> ForecastSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let listener = Arc::new(CollectionListener::new(path, tx));

        match self.store.add_value_listener(path, listener) {
            Ok(id) => {
                debug!("Subscribed to {}", path);
                let handle = ListenerHandle::new(Arc::clone(&self.store), id, path);
                ForecastSubscription::new(path, rx, Some(handle))
            }
            Err(e) => {
                error!("Error fetching {}: {}", path, e);
                ForecastSubscription::failed(path, GatewayError::Transport(e))
            }
        }
    }

    /// Current conditions on every change; malformed records arrive as the default
    pub fn fetch_current_conditions<F>(&self, on_update: F) -> GatewayResult<ListenerHandle>
    where
        F: Fn(CurrentConditions) + Send + Sync + 'static,
    {
        self.listen(paths::CURRENT_DATA, move |snapshot| {
            on_update(parsers::parse_current(&snapshot));
        })
    }

    /// Forecast samples on every change, malformed children dropped
    pub fn fetch_forecast_collection<F>(&self, on_update: F) -> GatewayResult<ListenerHandle>
    where
        F: Fn(ForecastCollection) + Send + Sync + 'static,
    {
        self.listen(paths::FORECASTING_DATA, move |snapshot| {
            on_update(parsers::parse_collection(&snapshot));
        })
    }

    /// Read the switch once in the background
    ///
    /// `on_result` gets `false` when the value is absent or not a boolean.
    /// On a transport failure the error is logged and `on_result` is never
    /// called.
    pub fn read_actuator_state<F>(&self, on_result: F) -> JoinHandle<()>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let gateway = self.clone();
        tokio::spawn(async move {
            match gateway.actuator_state().await {
                Ok(on) => on_result(on),
                Err(e) => error!("Error reading {}: {}", paths::actuator_led(), e),
            }
        })
    }

    /// One-shot read of the switch
    pub async fn actuator_state(&self) -> GatewayResult<bool> {
        let path = paths::actuator_led();
        let snapshot = self.store.get_once(&path).await?;
        let on = parsers::parse_switch(&snapshot);
        debug!("{} = {}", path, on);
        Ok(on)
    }

    /// Write both actuator outputs in one child update
    pub async fn write_actuator_state(&self, state: impl Into<ActuatorState>) -> GatewayResult<()> {
        let state = state.into();
        let (led, motor) = state.outputs();

        let mut updates = Map::new();
        updates.insert(paths::ACTUATOR_LED.to_string(), Value::Bool(led));
        updates.insert(paths::ACTUATOR_MOTOR.to_string(), Value::Bool(motor));

        match self.store.update_children(paths::ACTUATOR, updates).await {
            Ok(()) => {
                info!("Actuator values updated successfully (led={}, motor={})", led, motor);
                Ok(())
            }
            Err(e) => {
                error!("Failed to update actuator values: {}", e);
                Err(GatewayError::RemoteWrite {
                    path: paths::ACTUATOR.to_string(),
                    source: e,
                })
            }
        }
    }

    fn listen<F>(&self, path: &str, on_change: F) -> GatewayResult<ListenerHandle>
    where
        F: Fn(DataSnapshot) + Send + Sync + 'static,
    {
        let listener = Arc::new(CallbackListener {
            path: path.to_string(),
            on_change,
        });

        let id = self.store.add_value_listener(path, listener).map_err(|e| {
            error!("Error fetching {}: {}", path, e);
            GatewayError::Transport(e)
        })?;

        debug!("Listening on {}", path);
        Ok(ListenerHandle::new(Arc::clone(&self.store), id, path))
    }
}
