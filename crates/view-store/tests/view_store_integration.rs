//! Integration test: ViewStateStore <-> RemoteDataGateway <-> MemoryStore
//!
//! Remote writes land in the memory store, flow through the gateway and
//! must show up in the view store's observable state.

use serde_json::{Value, json};
use skywatch_core::CurrentConditions;
use skywatch_gateway::{GatewayError, MemoryStore, RemoteDataGateway};
use skywatch_ports::TransportError;
use skywatch_view_store::ViewStateStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn setup(root: Value) -> (Arc<MemoryStore>, ViewStateStore) {
    let _ = env_logger::try_init();
    let store = Arc::new(MemoryStore::with_root(root));
    let gateway = Arc::new(RemoteDataGateway::new(store.clone()));
    (store, ViewStateStore::new(gateway))
}

async fn eventually<F: Fn() -> bool>(condition: F) {
    timeout(Duration::from_secs(1), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

fn record(humidity: i64, temperature: f64, timestamp: &str) -> Value {
    json!({
        "humidity": humidity,
        "light": false,
        "rainfall": 0,
        "temperature": temperature,
        "timestamp": timestamp
    })
}

#[tokio::test]
async fn test_current_conditions_track_latest_record() {
    let (remote, view) = setup(Value::Null);
    assert_eq!(view.current_conditions_snapshot(), CurrentConditions::default());

    for (i, category) in ["sunny", "cloudy", "heavy_rain"].iter().enumerate() {
        remote.set(
            "current_data",
            json!({"humidity": 50 + i, "temperature": 10.0 + i as f64, "weather_name": category}),
        );
    }

    let current = view.current_conditions_snapshot();
    assert_eq!(current.humidity, 52);
    assert_eq!(current.temperature, 12.0);
    assert_eq!(current.weather_category, "heavy_rain");

    // A late observer sees the cached value immediately
    let observer = view.current_conditions();
    assert_eq!(observer.borrow().weather_category, "heavy_rain");

    // A malformed record resets the field to the default
    remote.set("current_data", json!({"humidity": [1, 2]}));
    assert_eq!(view.current_conditions_snapshot(), CurrentConditions::default());
}

#[tokio::test]
async fn test_weather_samples_follow_subscription() {
    let (remote, view) = setup(Value::Null);
    let mut samples = view.weather_samples();

    remote.push("weather_data", record(40, 20.0, "t1"));
    remote.push("weather_data", json!("garbage"));
    remote.push("weather_data", record(41, 21.0, "t3"));

    let latest = timeout(Duration::from_secs(1), samples.wait_for(|c| c.len() == 2))
        .await
        .expect("samples arrived")
        .expect("sender alive")
        .clone();
    assert_eq!(latest.samples()[0].timestamp, "t1");
    assert_eq!(latest.samples()[1].timestamp, "t3");
}

#[tokio::test]
async fn test_forecast_samples_replaced_wholesale() {
    let (remote, view) = setup(json!({
        "forecasting_data": {"-M1": record(60, 15.0, "f1"), "-M2": record(61, 16.0, "f2")}
    }));
    assert_eq!(view.forecast_samples_snapshot().len(), 2);

    remote.set("forecasting_data", json!({"-M9": record(70, 25.0, "f9")}));
    let forecast = view.forecast_samples_snapshot();
    assert_eq!(forecast.len(), 1);
    assert_eq!(forecast.samples()[0].timestamp, "f9");
}

#[tokio::test]
async fn test_set_actuator_state_writes_both_outputs() {
    let (remote, view) = setup(Value::Null);

    view.set_actuator_state(true).await.unwrap().unwrap();
    view.set_actuator_state(false).await.unwrap().unwrap();

    let writes = remote.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(Value::Object(writes[0].updates.clone()), json!({"led": true, "motor": true}));
    assert_eq!(Value::Object(writes[1].updates.clone()), json!({"led": false, "motor": false}));
}

#[tokio::test]
async fn test_dropped_ticket_still_writes() {
    let (remote, view) = setup(Value::Null);

    drop(view.set_actuator_state(true));
    eventually(|| remote.writes().len() == 1).await;
    assert_eq!(remote.value("aktuator/motor"), json!(true));
}

#[tokio::test]
async fn test_rejected_write_surfaces_through_ticket() {
    let (remote, view) = setup(Value::Null);
    remote.reject_writes(Some(TransportError::PermissionDenied("aktuator".to_string())));

    let result = view.set_actuator_state(true).await.unwrap();
    assert!(matches!(result, Err(GatewayError::RemoteWrite { .. })));
}

#[tokio::test]
async fn test_initial_actuator_state_and_toggle() {
    let (remote, view) = setup(json!({"aktuator": {"led": false, "motor": false}}));

    let (tx, rx) = tokio::sync::oneshot::channel();
    view.request_initial_actuator_state(move |on| {
        let _ = tx.send(on);
    });
    assert!(!rx.await.unwrap());

    assert!(view.toggle_actuator().await.unwrap().unwrap());
    assert_eq!(remote.value("aktuator"), json!({"led": true, "motor": true}));

    assert!(!view.toggle_actuator().await.unwrap().unwrap());
    assert_eq!(remote.value("aktuator"), json!({"led": false, "motor": false}));
}

#[tokio::test]
async fn test_shutdown_releases_all_listeners() {
    let (remote, view) = setup(Value::Null);
    assert_eq!(remote.listener_count(), 3);
    assert!(view.is_running());

    view.shutdown();
    eventually(|| remote.listener_count() == 0).await;
    assert_eq!(remote.removal_count(), 3);
    assert!(!view.is_running());

    view.shutdown();
    drop(view);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(remote.removal_count(), 3);
}

#[tokio::test]
async fn test_drop_releases_all_listeners() {
    let (remote, view) = setup(Value::Null);
    assert_eq!(remote.listener_count(), 3);

    drop(view);
    eventually(|| remote.listener_count() == 0).await;
    assert_eq!(remote.removal_count(), 3);
}

/// Commands spawn onto the ambient runtime
#[test]
#[should_panic]
fn test_set_actuator_state_outside_runtime_panics() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let (_remote, view) = runtime.block_on(async { setup(Value::Null) });

    let _ticket = view.set_actuator_state(true);
}

#[test]
#[should_panic]
fn test_toggle_actuator_outside_runtime_panics() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let (_remote, view) = runtime.block_on(async { setup(Value::Null) });

    let _toggle = view.toggle_actuator();
}
