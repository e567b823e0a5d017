//! Cancellable stream of collection snapshots

use futures_util::Stream;
use log::{debug, error};
use skywatch_core::ForecastCollection;
use skywatch_ports::{DataSnapshot, TransportError, ValueListener};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

use crate::error::{GatewayError, GatewayResult};
use crate::handle::ListenerHandle;
use crate::parsers;

type Item = GatewayResult<ForecastCollection>;

/// Stream of full collections, one per upstream change
///
/// Each item is the whole parsed collection, never a diff. An upstream
/// cancellation is yielded once as `Err` and ends the stream. Closing (or
/// dropping) the subscription removes the upstream listener exactly once;
/// nothing is yielded afterwards.
pub struct ForecastSubscription {
    path: String,
    rx: mpsc::UnboundedReceiver<Item>,
    handle: Option<ListenerHandle>,
    finished: bool,
}

impl ForecastSubscription {
    pub(crate) fn new(
        path: impl Into<String>,
        rx: mpsc::UnboundedReceiver<Item>,
        handle: Option<ListenerHandle>,
    ) -> Self {
        Self {
            path: path.into(),
            rx,
            handle,
            finished: false,
        }
    }

    /// A subscription whose registration failed: yields the error, then ends
    pub(crate) fn failed(path: impl Into<String>, error: GatewayError) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(Err(error));
        Self::new(path, rx, None)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// True until the stream has ended or been closed
    pub fn is_open(&self) -> bool {
        !self.finished
    }

    /// Stop the subscription and release the upstream listener
    pub fn close(&mut self) {
        if !self.finished {
            debug!("Closing subscription on {}", self.path);
        }
        self.finished = true;
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
        self.rx.close();
    }
}

impl Stream for ForecastSubscription {
    type Item = Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(Ok(collection))) => Poll::Ready(Some(Ok(collection))),
            Poll::Ready(Some(Err(e))) => {
                self.close();
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.close();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ForecastSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

/// Listener feeding a subscription's channel
pub(crate) struct CollectionListener {
    path: String,
    tx: mpsc::UnboundedSender<Item>,
}

impl CollectionListener {
    pub(crate) fn new(path: impl Into<String>, tx: mpsc::UnboundedSender<Item>) -> Self {
        Self {
            path: path.into(),
            tx,
        }
    }
}

impl ValueListener for CollectionListener {
    fn on_data_change(&self, snapshot: DataSnapshot) {
        let collection = parsers::parse_collection(&snapshot);
        debug!("{} -> {} records", self.path, collection.len());
        // Receiver gone means the subscription was closed
        let _ = self.tx.send(Ok(collection));
    }

    fn on_cancelled(&self, error: TransportError) {
        error!("Error fetching {}: {}", self.path, error);
        let _ = self.tx.send(Err(GatewayError::Transport(error)));
    }
}
