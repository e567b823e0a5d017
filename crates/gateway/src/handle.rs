//! Scoped listener registrations

use log::debug;
use skywatch_ports::{ListenerId, RealtimeStore};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle to one persistent listener registered with the store
///
/// `cancel()` removes the registration; it is idempotent, and dropping an
/// active handle cancels it. A handle issues at most one removal call.
pub struct ListenerHandle {
    store: Arc<dyn RealtimeStore>,
    id: ListenerId,
    path: String,
    active: AtomicBool,
}

impl ListenerHandle {
    pub(crate) fn new(store: Arc<dyn RealtimeStore>, id: ListenerId, path: impl Into<String>) -> Self {
        Self {
            store,
            id,
            path: path.into(),
            active: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Remove the listener from the store
    pub fn cancel(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            debug!(
                "Removing listener {} on {} from {}",
                self.id,
                self.path,
                self.store.name()
            );
            self.store.remove_listener(self.id);
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("active", &self.is_active())
            .finish()
    }
}
