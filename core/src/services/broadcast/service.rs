//! Event broadcaster implementation.
//!
//! Constructed at service startup and injected wherever decisions are
//! committed or observed; nothing here relies on ambient global state.

use std::sync::Arc;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::ClearanceResult;

use super::transport::{BroadcastTransport, SessionGroup};

/// Event name carried with every committed decision
pub const DECISION_EVENT: &str = "gate.decision";

/// Fan-out of committed decisions to live dashboard sessions
pub struct EventBroadcaster<T>
where
    T: BroadcastTransport,
{
    transport: Arc<T>,
}

impl<T> EventBroadcaster<T>
where
    T: BroadcastTransport,
{
    /// Create a broadcaster over the given transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Register a dashboard session in a group
    pub async fn subscribe(&self, session_id: &str, group: SessionGroup) -> ClearanceResult<()> {
        self.transport.join(session_id, group).await?;
        tracing::debug!(
            session_id = session_id,
            group = %group,
            event = "session_subscribed",
            "Dashboard session joined"
        );
        Ok(())
    }

    /// Fan a committed decision out to both groups
    ///
    /// Best-effort and at-least-once per live session. The decision is
    /// already durable when this runs; a delivery failure is logged and
    /// swallowed, never propagated back to the commit path.
    pub async fn publish(&self, record: &VerificationRecord) {
        let payload = match serde_json::to_value(record) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    record_id = %record.id,
                    error = %e,
                    event = "broadcast_encode_failed",
                    "Could not encode decision event"
                );
                return;
            }
        };

        for group in [SessionGroup::Examiners, SessionGroup::Admins] {
            if let Err(e) = self
                .transport
                .emit(group, DECISION_EVENT, payload.clone())
                .await
            {
                tracing::warn!(
                    record_id = %record.id,
                    group = %group,
                    error = %e,
                    event = "broadcast_failed",
                    "Decision event delivery failed"
                );
            }
        }
    }
}
