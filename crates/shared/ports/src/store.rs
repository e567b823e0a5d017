use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{DataSnapshot, ListenerId, TransportResult, ValueListener};

/// Port for a hosted, path-addressed, listener-based real-time store
///
/// Paths are `/`-separated and relative to the database root.
/// Implementations:
/// - In-memory store for tests and simulation
/// - Hosted database over REST with streamed change notifications
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Register a persistent listener on `path`
    ///
    /// The current value is delivered promptly after registration, then again
    /// each time the value at `path` changes, until the listener is removed
    /// or cancelled by the store.
    fn add_value_listener(
        &self,
        path: &str,
        listener: Arc<dyn ValueListener>,
    ) -> TransportResult<ListenerId>;

    /// Stop delivering to a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// Read the value at `path` once
    async fn get_once(&self, path: &str) -> TransportResult<DataSnapshot>;

    /// Atomically update several direct children of `path`
    ///
    /// A `null` value deletes the child.
    async fn update_children(&self, path: &str, updates: Map<String, Value>)
    -> TransportResult<()>;

    /// Get the store's name for logging
    fn name(&self) -> &str {
        "RealtimeStore"
    }
}

/// Strip leading/trailing separators and collapse empty segments
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ensure the port is object-safe
    fn _assert_store_object_safe(_: &dyn RealtimeStore) {}
    fn _assert_listener_object_safe(_: &dyn ValueListener) {}

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/aktuator/led/"), "aktuator/led");
        assert_eq!(normalize_path("weather_data"), "weather_data");
        assert_eq!(normalize_path("a//b"), "a/b");
        assert_eq!(normalize_path("/"), "");
    }
}
