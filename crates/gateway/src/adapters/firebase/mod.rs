//! Hosted real-time database adapter
//!
//! - One-shot reads: `GET {base}/{path}.json`
//! - Child updates: `PATCH {base}/{path}.json` with the child map as body
//! - Value listeners: `GET` with `Accept: text/event-stream`, one task each
//!
//! The auth token, when configured, is sent as the `auth` query parameter.
//! Streams are not reconnected; a dropped stream cancels its listener.

mod sse;
mod stream;

pub use sse::{SseDecoder, SseEvent};

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use skywatch_ports::{
    DataSnapshot, ListenerId, RealtimeStore, TransportError, TransportResult, ValueListener,
    normalize_path,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use url::Url;

/// Characters the hosted store rejects in keys
const FORBIDDEN_KEY_CHARS: [char; 5] = ['.', '#', '$', '[', ']'];

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// Database root, e.g. `https://example-default-rtdb.firebaseio.com/`
    pub database_url: String,
    pub auth_token: Option<String>,
    /// Applies to one-shot reads and writes, and to connecting a stream
    pub request_timeout: Duration,
}

impl FirebaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            auth_token: None,
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

pub struct FirebaseStore {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
    request_timeout: Duration,
    streams: DashMap<ListenerId, JoinHandle<()>>,
}

impl FirebaseStore {
    pub fn new(config: FirebaseConfig) -> TransportResult<Self> {
        let mut base_url = Url::parse(&config.database_url)
            .map_err(|e| TransportError::InvalidPath(format!("{}: {}", config.database_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        // No client-wide timeout: it would also cut long-lived streams
        let client = Client::builder()
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        info!("Hosted store at {}", base_url);
        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token,
            request_timeout: config.request_timeout,
            streams: DashMap::new(),
        })
    }

    /// REST endpoint for `path`
    pub fn endpoint(&self, path: &str) -> TransportResult<Url> {
        let path = normalize_path(path);
        if path.contains(&FORBIDDEN_KEY_CHARS[..]) {
            return Err(TransportError::InvalidPath(path));
        }

        let mut url = self
            .base_url
            .join(&format!("{}.json", path))
            .map_err(|e| TransportError::InvalidPath(format!("{}: {}", path, e)))?;
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    /// Number of running listener streams
    pub fn active_streams(&self) -> usize {
        self.streams.len()
    }
}

impl Drop for FirebaseStore {
    fn drop(&mut self) {
        for entry in self.streams.iter() {
            entry.value().abort();
        }
    }
}

#[async_trait]
impl RealtimeStore for FirebaseStore {
    fn add_value_listener(
        &self,
        path: &str,
        listener: Arc<dyn ValueListener>,
    ) -> TransportResult<ListenerId> {
        let url = self.endpoint(path)?;
        let runtime = Handle::try_current()
            .map_err(|_| TransportError::Disconnected("no async runtime".to_string()))?;

        let id = ListenerId::new();
        let task = runtime.spawn(stream::run_listener(
            self.client.clone(),
            url,
            normalize_path(path),
            listener,
        ));
        self.streams.insert(id, task);

        debug!("Listener {} streaming {}", id, path);
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        if let Some((_, task)) = self.streams.remove(&id) {
            task.abort();
            debug!("Listener {} stopped", id);
        }
    }

    async fn get_once(&self, path: &str) -> TransportResult<DataSnapshot> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(network_error)?;

        let value: Value = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| TransportError::Serialization(e.to_string()))?;
        Ok(DataSnapshot::at(&normalize_path(path), value))
    }

    async fn update_children(&self, path: &str, updates: Map<String, Value>) -> TransportResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let url = self.endpoint(path)?;
        let response = self
            .client
            .patch(url)
            .timeout(self.request_timeout)
            .json(&Value::Object(updates))
            .send()
            .await
            .map_err(network_error)?;

        check_status(response).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "FirebaseStore"
    }
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

fn network_error(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

/// Map non-success statuses to transport errors
pub(crate) async fn check_status(response: Response) -> TransportResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&text)
        .map(|e| e.error)
        .unwrap_or(text);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(TransportError::PermissionDenied(message))
        }
        _ => Err(TransportError::Http {
            status: status.as_u16(),
            message,
        }),
    }
}
