//! Integration test: RemoteDataGateway <-> MemoryStore
//!
//! Exercises the gateway through the store port only:
//! store writes -> listeners -> parsers -> callbacks / subscription stream

use futures_util::StreamExt;
use parking_lot::Mutex;
use serde_json::{Value, json};
use skywatch_core::{CurrentConditions, ForecastCollection};
use skywatch_gateway::{GatewayError, MemoryStore, RemoteDataGateway};
use skywatch_ports::TransportError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

fn sample(humidity: i64, timestamp: &str) -> Value {
    json!({
        "humidity": humidity,
        "light": humidity % 2 == 0,
        "rainfall": 0,
        "temperature": 20.0,
        "timestamp": timestamp
    })
}

fn setup(root: Value) -> (Arc<MemoryStore>, RemoteDataGateway) {
    let _ = env_logger::try_init();
    let store = Arc::new(MemoryStore::with_root(root));
    let gateway = RemoteDataGateway::new(store.clone());
    (store, gateway)
}

/// Malformed children are excluded, well-formed siblings kept
#[tokio::test]
async fn test_subscription_drops_malformed_records() {
    let (store, gateway) = setup(json!({
        "weather_data": {
            "-A1": sample(40, "t1"),
            "-A2": {"humidity": "very"},
            "-A3": sample(42, "t3"),
            "-A4": ["not", "a", "record"]
        }
    }));

    let mut subscription = gateway.subscribe_forecast_collection();
    let first = timeout(Duration::from_secs(1), subscription.next())
        .await
        .expect("initial emission")
        .expect("stream open")
        .expect("no error");

    let timestamps: Vec<_> = first.iter().map(|s| s.timestamp.as_str()).collect();
    assert_eq!(timestamps, vec!["t1", "t3"]);

    // Each change re-emits the whole collection
    store.push("weather_data", sample(44, "t5"));
    let second = timeout(Duration::from_secs(1), subscription.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(second.len(), 3);
    assert_eq!(second.last().unwrap().timestamp, "t5");
}

/// Closing removes the upstream listener once and stops emissions
#[tokio::test]
async fn test_subscription_close_removes_listener_once() {
    let (store, gateway) = setup(Value::Null);

    let mut subscription = gateway.subscribe_forecast_collection();
    let initial = subscription.next().await.unwrap().unwrap();
    assert!(initial.is_empty());
    assert_eq!(store.listener_count(), 1);

    subscription.close();
    subscription.close();
    store.push("weather_data", sample(50, "late"));

    assert_eq!(subscription.next().await.map(|r| r.is_ok()), None);
    assert_eq!(store.listener_count(), 0);
    assert_eq!(store.removal_count(), 1);

    drop(subscription);
    assert_eq!(store.removal_count(), 1);
}

#[tokio::test]
async fn test_subscription_drop_removes_listener() {
    let (store, gateway) = setup(Value::Null);

    let subscription = gateway.subscribe_forecast_collection();
    assert_eq!(store.listener_count(), 1);
    drop(subscription);

    assert_eq!(store.listener_count(), 0);
    assert_eq!(store.removal_count(), 1);
}

/// Upstream cancellation terminates the stream with one error
#[tokio::test]
async fn test_subscription_terminates_on_cancellation() {
    let (store, gateway) = setup(json!({"weather_data": {"-M1": sample(40, "t1")}}));

    let mut subscription = gateway.subscribe_forecast_collection();
    assert_eq!(subscription.next().await.unwrap().unwrap().len(), 1);

    store.cancel_listeners(
        "weather_data",
        TransportError::PermissionDenied("weather_data".to_string()),
    );

    match subscription.next().await {
        Some(Err(GatewayError::Transport(TransportError::PermissionDenied(_)))) => {}
        other => panic!("expected permission error, got {:?}", other.map(|r| r.is_ok())),
    }
    assert!(subscription.next().await.is_none());
    assert!(!subscription.is_open());
}

/// Every update to current_data replaces the previous value wholesale
#[tokio::test]
async fn test_current_conditions_whole_value_replacement() {
    let (store, gateway) = setup(Value::Null);

    let latest = Arc::new(Mutex::new(None::<CurrentConditions>));
    let sink = latest.clone();
    let _handle = gateway
        .fetch_current_conditions(move |current| *sink.lock() = Some(current))
        .unwrap();

    // Absent record arrives as the default
    assert_eq!(latest.lock().clone(), Some(CurrentConditions::default()));

    store.set(
        "current_data",
        json!({"humidity": 70, "light": true, "rainfall": 3, "temperature": 18.5,
               "timestamp": "2024-05-01 10:00:00", "weather_name": "light_rain"}),
    );
    store.set(
        "current_data",
        json!({"humidity": 65, "temperature": 19.0, "weather_name": "cloudy"}),
    );

    let current = latest.lock().clone().unwrap();
    assert_eq!(current.humidity, 65);
    assert_eq!(current.temperature, 19.0);
    assert_eq!(current.weather_category, "cloudy");
    // Fields missing from the newest record do not survive from the older one
    assert!(!current.light);
    assert_eq!(current.rainfall, 0);
    assert_eq!(current.timestamp, "");
}

#[tokio::test]
async fn test_forecast_callback_and_cancellation() {
    let (store, gateway) = setup(Value::Null);

    let updates = Arc::new(Mutex::new(Vec::<ForecastCollection>::new()));
    let sink = updates.clone();
    let handle = gateway
        .fetch_forecast_collection(move |forecast| sink.lock().push(forecast))
        .unwrap();

    for i in 1..=3 {
        store.push("forecasting_data", sample(i, &format!("f{}", i)));
    }
    store.push("forecasting_data", json!({"rainfall": true}));

    store.cancel_listeners("forecasting_data", TransportError::AuthRevoked);
    store.push("forecasting_data", sample(9, "f9"));

    let updates = updates.lock();
    // Initial empty value plus four pushes; nothing after cancellation
    assert_eq!(updates.len(), 5);
    assert_eq!(updates[4].len(), 3);

    handle.cancel();
    assert_eq!(store.removal_count(), 0);
}

#[tokio::test]
async fn test_read_actuator_state_defaults() {
    let cases = vec![
        (json!({"aktuator": {"led": true}}), true),
        (json!({"aktuator": {"led": false, "motor": true}}), false),
        (json!({"aktuator": {"motor": true}}), false),
        (json!({"aktuator": {"led": "on"}}), false),
        (Value::Null, false),
    ];

    for (root, expected) in cases {
        let (_, gateway) = setup(root);
        let (tx, rx) = tokio::sync::oneshot::channel();
        gateway.read_actuator_state(move |on| {
            let _ = tx.send(on);
        });
        let on = timeout(Duration::from_secs(1), rx).await.unwrap().unwrap();
        assert_eq!(on, expected);
    }
}

#[tokio::test]
async fn test_write_actuator_state_keeps_outputs_equal() {
    let (store, gateway) = setup(json!({"aktuator": {"led": false, "motor": false}}));

    gateway.write_actuator_state(true).await.unwrap();
    assert_eq!(store.value("aktuator"), json!({"led": true, "motor": true}));

    gateway.write_actuator_state(false).await.unwrap();
    assert_eq!(store.value("aktuator"), json!({"led": false, "motor": false}));

    let writes = store.writes();
    assert_eq!(writes.len(), 2);
    for write in writes {
        assert_eq!(write.path, "aktuator");
        assert_eq!(write.updates.len(), 2);
        assert_eq!(write.updates["led"], write.updates["motor"]);
    }
}
