//! In-process real-time store
//!
//! Holds the whole database as one JSON tree. Value listeners receive the
//! current value when they register and again whenever a write changes the
//! value at their path. Callbacks run on the writing thread, after the tree
//! lock is released, under a reentrant delivery lock that keeps notifications
//! in write order across threads.
//!
//! Test hooks: injected read/write rejections, forced listener cancellation,
//! a log of child updates and a count of listener removals.

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info, warn};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use serde_json::{Map, Value};
use skywatch_ports::{
    DataSnapshot, ListenerId, RealtimeStore, TransportError, TransportResult, ValueListener,
    normalize_path,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::tree;

/// One `update_children` call as received by the store
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub path: String,
    pub updates: Map<String, Value>,
}

struct Registration {
    path: String,
    listener: Arc<dyn ValueListener>,
}

pub struct MemoryStore {
    root: RwLock<Value>,
    // Always taken before `root`
    delivery: ReentrantMutex<()>,
    listeners: DashMap<ListenerId, Registration>,
    removals: AtomicUsize,
    push_sequence: AtomicU64,
    writes: Mutex<Vec<WriteRecord>>,
    read_failure: RwLock<Option<TransportError>>,
    write_failure: RwLock<Option<TransportError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_root(Value::Null)
    }

    /// Store seeded with an initial tree
    pub fn with_root(root: Value) -> Self {
        Self {
            root: RwLock::new(root),
            delivery: ReentrantMutex::new(()),
            listeners: DashMap::new(),
            removals: AtomicUsize::new(0),
            push_sequence: AtomicU64::new(0),
            writes: Mutex::new(Vec::new()),
            read_failure: RwLock::new(None),
            write_failure: RwLock::new(None),
        }
    }

    /// Current value at `path`
    pub fn value(&self, path: &str) -> Value {
        tree::get(&self.root.read(), &normalize_path(path))
    }

    /// Replace the value at `path` (`null` deletes) and notify listeners
    pub fn set(&self, path: &str, value: Value) {
        let path = normalize_path(path);
        self.apply(&[path.clone()], |root| tree::set(root, &path, value));
    }

    pub fn remove(&self, path: &str) {
        self.set(path, Value::Null);
    }

    /// Append a child under a generated, chronologically ordered key
    pub fn push(&self, path: &str, value: Value) -> String {
        let sequence = self.push_sequence.fetch_add(1, Ordering::SeqCst);
        let key = format!("-M{:016x}", sequence);
        self.set(&format!("{}/{}", normalize_path(path), key), value);
        key
    }

    /// Make every subsequent `get_once` fail with `error`
    pub fn reject_reads(&self, error: Option<TransportError>) {
        *self.read_failure.write() = error;
    }

    /// Make every subsequent `update_children` fail with `error`
    pub fn reject_writes(&self, error: Option<TransportError>) {
        *self.write_failure.write() = error;
    }

    /// Drop every listener at or below `path`, reporting `error` to each
    ///
    /// Mirrors the hosted store revoking access to a subtree. Returns the
    /// number of listeners cancelled.
    pub fn cancel_listeners(&self, path: &str, error: TransportError) -> usize {
        let path = normalize_path(path);
        let _delivery = self.delivery.lock();
        let ids: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|entry| tree::related(&path, &entry.path) && entry.path.len() >= path.len())
            .map(|entry| *entry.key())
            .collect();

        let mut cancelled = 0;
        for id in ids {
            if let Some((_, registration)) = self.listeners.remove(&id) {
                warn!("Cancelling listener {} on {}: {}", id, registration.path, error);
                registration.listener.on_cancelled(error.clone());
                cancelled += 1;
            }
        }
        cancelled
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of `remove_listener` calls that removed a live registration
    pub fn removal_count(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }

    /// Child updates received so far, oldest first
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.writes.lock().clone()
    }

    /// Mutate the tree and notify listeners whose value changed
    fn apply<F>(&self, changed: &[String], mutate: F)
    where
        F: FnOnce(&mut Value),
    {
        let _delivery = self.delivery.lock();
        let notifications: Vec<(Arc<dyn ValueListener>, DataSnapshot)> = {
            let mut root = self.root.write();

            let affected: Vec<(String, Arc<dyn ValueListener>, Value)> = self
                .listeners
                .iter()
                .filter(|entry| changed.iter().any(|p| tree::related(p, &entry.path)))
                .map(|entry| {
                    let before = tree::get(&root, &entry.path);
                    (entry.path.clone(), Arc::clone(&entry.listener), before)
                })
                .collect();

            mutate(&mut root);

            affected
                .into_iter()
                .filter_map(|(path, listener, before)| {
                    let after = tree::get(&root, &path);
                    (after != before).then(|| (listener, DataSnapshot::at(&path, after)))
                })
                .collect()
        };

        for (listener, snapshot) in notifications {
            listener.on_data_change(snapshot);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeStore for MemoryStore {
    fn add_value_listener(
        &self,
        path: &str,
        listener: Arc<dyn ValueListener>,
    ) -> TransportResult<ListenerId> {
        let path = normalize_path(path);
        let id = ListenerId::new();

        // Register and read under the same lock so no write slips in between
        let _delivery = self.delivery.lock();
        let initial = {
            let root = self.root.read();
            self.listeners.insert(
                id,
                Registration {
                    path: path.clone(),
                    listener: Arc::clone(&listener),
                },
            );
            tree::get(&root, &path)
        };

        debug!("Listener {} registered on {}", id, path);
        listener.on_data_change(DataSnapshot::at(&path, initial));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        if let Some((_, registration)) = self.listeners.remove(&id) {
            self.removals.fetch_add(1, Ordering::SeqCst);
            debug!("Listener {} on {} removed", id, registration.path);
        }
    }

    async fn get_once(&self, path: &str) -> TransportResult<DataSnapshot> {
        if let Some(error) = self.read_failure.read().clone() {
            return Err(error);
        }
        let path = normalize_path(path);
        Ok(DataSnapshot::at(&path, self.value(&path)))
    }

    async fn update_children(&self, path: &str, updates: Map<String, Value>) -> TransportResult<()> {
        if let Some(error) = self.write_failure.read().clone() {
            return Err(error);
        }

        let path = normalize_path(path);
        self.writes.lock().push(WriteRecord {
            path: path.clone(),
            updates: updates.clone(),
        });

        let changed: Vec<String> = updates
            .keys()
            .map(|key| tree::segments(&format!("{}/{}", path, key)).join("/"))
            .collect();
        self.apply(&changed, |root| tree::merge(root, &path, &updates));

        info!("Updated {} children of {}", updates.len(), path);
        Ok(())
    }

    fn name(&self) -> &str {
        "MemoryStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        values: Mutex<Vec<Value>>,
        errors: Mutex<Vec<TransportError>>,
    }

    impl ValueListener for Recorder {
        fn on_data_change(&self, snapshot: DataSnapshot) {
            self.values.lock().push(snapshot.into_value());
        }

        fn on_cancelled(&self, error: TransportError) {
            self.errors.lock().push(error);
        }
    }

    #[test]
    fn test_listener_gets_initial_and_changed_values() {
        let store = MemoryStore::with_root(json!({"aktuator": {"led": false}}));
        let recorder = Arc::new(Recorder::default());
        store.add_value_listener("aktuator", recorder.clone()).unwrap();

        store.set("aktuator/led", json!(true));
        // Unrelated and no-op writes do not notify
        store.set("current_data/humidity", json!(40));
        store.set("aktuator/led", json!(true));

        let values = recorder.values.lock().clone();
        assert_eq!(values, vec![json!({"led": false}), json!({"led": true})]);
    }

    #[test]
    fn test_push_keys_keep_arrival_order() {
        let store = MemoryStore::new();
        let first = store.push("weather_data", json!({"humidity": 1}));
        let second = store.push("weather_data", json!({"humidity": 2}));
        assert!(first < second);

        let snapshot = DataSnapshot::at("weather_data", store.value("weather_data"));
        let keys: Vec<_> = snapshot
            .children()
            .iter()
            .map(|c| c.key().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec![first, second]);
    }

    #[test]
    fn test_remove_listener_counts_live_removals_only() {
        let store = MemoryStore::new();
        let id = store
            .add_value_listener("weather_data", Arc::new(Recorder::default()))
            .unwrap();
        assert_eq!(store.listener_count(), 1);

        store.remove_listener(id);
        store.remove_listener(id);
        assert_eq!(store.listener_count(), 0);
        assert_eq!(store.removal_count(), 1);
    }

    #[test]
    fn test_cancel_listeners_reports_error() {
        let store = MemoryStore::new();
        let recorder = Arc::new(Recorder::default());
        store.add_value_listener("weather_data", recorder.clone()).unwrap();
        store
            .add_value_listener("current_data", Arc::new(Recorder::default()))
            .unwrap();

        let cancelled = store.cancel_listeners(
            "weather_data",
            TransportError::PermissionDenied("weather_data".to_string()),
        );
        assert_eq!(cancelled, 1);
        assert_eq!(store.listener_count(), 1);
        assert_eq!(recorder.errors.lock().len(), 1);

        store.push("weather_data", json!({"humidity": 3}));
        assert_eq!(recorder.values.lock().len(), 1);
    }

    #[test]
    fn test_concurrent_writers_leave_listener_on_latest_value() {
        let store = MemoryStore::new();
        let recorder = Arc::new(Recorder::default());
        store.add_value_listener("current_data", recorder.clone()).unwrap();

        for round in 0..50 {
            std::thread::scope(|scope| {
                for writer in 0..4 {
                    let store = &store;
                    scope.spawn(move || {
                        for i in 0..20 {
                            store.set("current_data", json!({"writer": writer, "i": i, "round": round}));
                        }
                    });
                }
            });

            let delivered = recorder.values.lock().last().cloned();
            assert_eq!(delivered, Some(store.value("current_data")));
        }
    }

    #[test]
    fn test_listener_may_write_from_callback() {
        struct Mirror {
            store: Arc<MemoryStore>,
        }

        impl ValueListener for Mirror {
            fn on_data_change(&self, snapshot: DataSnapshot) {
                self.store.set("mirror", snapshot.into_value());
            }

            fn on_cancelled(&self, _error: TransportError) {}
        }

        let store = Arc::new(MemoryStore::new());
        store
            .add_value_listener("source", Arc::new(Mirror { store: store.clone() }))
            .unwrap();

        store.set("source", json!(7));
        assert_eq!(store.value("mirror"), json!(7));
    }

    #[tokio::test]
    async fn test_update_children_merges_and_logs() {
        let store = MemoryStore::with_root(json!({"aktuator": {"led": false, "motor": false}}));
        let recorder = Arc::new(Recorder::default());
        store.add_value_listener("aktuator/led", recorder.clone()).unwrap();

        let mut updates = Map::new();
        updates.insert("led".to_string(), json!(true));
        updates.insert("motor".to_string(), json!(true));
        store.update_children("aktuator", updates).await.unwrap();

        assert_eq!(store.value("aktuator"), json!({"led": true, "motor": true}));
        assert_eq!(store.writes().len(), 1);
        assert_eq!(store.writes()[0].path, "aktuator");
        assert_eq!(recorder.values.lock().clone(), vec![json!(false), json!(true)]);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        store.reject_reads(Some(TransportError::Network("offline".to_string())));
        store.reject_writes(Some(TransportError::PermissionDenied("aktuator".to_string())));

        assert!(store.get_once("aktuator/led").await.is_err());
        assert!(store.update_children("aktuator", Map::new()).await.is_err());
        assert!(store.writes().is_empty());

        store.reject_reads(None);
        let snapshot = store.get_once("aktuator/led").await.unwrap();
        assert!(!snapshot.exists());
    }
}
