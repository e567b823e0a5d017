//! Listener stream task
//!
//! One task per value listener. The hosted store sends the full value at the
//! path as an initial `put`, then incremental `put`/`patch` events relative
//! to it; the task keeps a local copy and hands the listener the whole value
//! after every change.

use futures_util::StreamExt;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use skywatch_ports::{DataSnapshot, TransportError, ValueListener};
use std::sync::Arc;
use url::Url;

use super::check_status;
use super::sse::{SseDecoder, SseEvent};
use crate::adapters::tree;

#[derive(Debug, Deserialize)]
struct EventPayload {
    path: String,
    data: Value,
}

#[derive(Debug, PartialEq)]
pub(crate) enum StreamStep {
    Changed,
    Idle,
    Cancelled(TransportError),
}

/// Apply one event to the local copy of the listened value
pub(crate) fn apply_event(cache: &mut Value, event: &SseEvent) -> StreamStep {
    match event.event.as_str() {
        "put" | "patch" => {
            let payload: EventPayload = match serde_json::from_str(&event.data) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Ignoring malformed {} event: {}", event.event, e);
                    return StreamStep::Idle;
                }
            };

            if event.event == "put" {
                tree::set(cache, &payload.path, payload.data);
            } else if let Value::Object(updates) = &payload.data {
                tree::merge(cache, &payload.path, updates);
            } else {
                warn!("Ignoring patch with non-object data at {}", payload.path);
                return StreamStep::Idle;
            }
            StreamStep::Changed
        }
        "keep-alive" => StreamStep::Idle,
        "cancel" => StreamStep::Cancelled(TransportError::PermissionDenied(
            event.data.trim_matches('"').to_string(),
        )),
        "auth_revoked" => StreamStep::Cancelled(TransportError::AuthRevoked),
        other => {
            debug!("Unknown stream event: {}", other);
            StreamStep::Idle
        }
    }
}

/// Stream the value at `url` into `listener` until the connection ends
///
/// Aborting the task (listener removal) ends it silently. Any other end of
/// the stream is reported through `on_cancelled`.
pub(crate) async fn run_listener(
    client: Client,
    url: Url,
    path: String,
    listener: Arc<dyn ValueListener>,
) {
    let response = match client.get(url).header(ACCEPT, "text/event-stream").send().await {
        Ok(response) => response,
        Err(e) => {
            listener.on_cancelled(TransportError::Network(e.to_string()));
            return;
        }
    };
    let response = match check_status(response).await {
        Ok(response) => response,
        Err(e) => {
            listener.on_cancelled(e);
            return;
        }
    };

    debug!("Streaming {}", path);
    let mut decoder = SseDecoder::new();
    let mut cache = Value::Null;
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                listener.on_cancelled(TransportError::Network(e.to_string()));
                return;
            }
        };

        for event in decoder.feed(&chunk) {
            match apply_event(&mut cache, &event) {
                StreamStep::Changed => {
                    listener.on_data_change(DataSnapshot::at(&path, cache.clone()));
                }
                StreamStep::Idle => {}
                StreamStep::Cancelled(error) => {
                    listener.on_cancelled(error);
                    return;
                }
            }
        }
    }

    listener.on_cancelled(TransportError::Disconnected(format!(
        "stream for {} ended",
        path
    )));
}
