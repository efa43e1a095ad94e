//! Broadcast transport implementations.

mod memory;

pub use memory::{InMemoryBroadcastTransport, SessionEvent};
