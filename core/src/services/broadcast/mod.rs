//! Dashboard fan-out of committed decisions.

mod service;
mod transport;

pub use service::{EventBroadcaster, DECISION_EVENT};
pub use transport::{BroadcastTransport, SessionGroup};
