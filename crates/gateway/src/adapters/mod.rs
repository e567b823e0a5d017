//! Store adapters
//!
//! Implementations of the `RealtimeStore` port: an in-process JSON tree used
//! by the simulated sensor node and the tests, and a hosted real-time
//! database reached over REST with an event stream per listener.

pub mod firebase;
pub mod memory;
pub(crate) mod tree;

pub use firebase::{FirebaseConfig, FirebaseStore};
pub use memory::{MemoryStore, WriteRecord};
