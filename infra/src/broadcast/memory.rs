//! In-process broadcast transport.
//!
//! Keeps a registry of per-session channels and group memberships behind a
//! single lock. Delivery is best-effort: a session whose receiver has gone
//! away is pruned on the next emit, and there is no backlog: a session
//! joining after an emit never sees that event.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

use eg_core::errors::ClearanceError;
use eg_core::services::broadcast::{BroadcastTransport, SessionGroup};

/// An event as delivered to one dashboard session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    /// Event name
    pub event: String,
    /// Event payload
    pub payload: JsonValue,
}

#[derive(Default)]
struct Registry {
    /// Open channels, by session
    senders: HashMap<String, mpsc::UnboundedSender<SessionEvent>>,
    /// Group memberships, by group
    members: HashMap<SessionGroup, HashSet<String>>,
}

/// In-memory session registry implementing the broadcast transport
#[derive(Default)]
pub struct InMemoryBroadcastTransport {
    registry: RwLock<Registry>,
}

impl InMemoryBroadcastTransport {
    /// Create an empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a receiving channel for a session
    ///
    /// Call before `join`; events emitted to any group the session then
    /// joins arrive on the returned receiver. Attaching again replaces the
    /// previous channel.
    pub async fn attach(&self, session_id: &str) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.registry.write().await;
        registry.senders.insert(session_id.to_string(), tx);
        rx
    }
}

#[async_trait]
impl BroadcastTransport for InMemoryBroadcastTransport {
    async fn join(&self, session_id: &str, group: SessionGroup) -> Result<(), ClearanceError> {
        let mut registry = self.registry.write().await;
        if !registry.senders.contains_key(session_id) {
            return Err(ClearanceError::Validation {
                message: format!("session {} has no open channel", session_id),
            });
        }
        registry
            .members
            .entry(group)
            .or_default()
            .insert(session_id.to_string());
        Ok(())
    }

    async fn emit(
        &self,
        group: SessionGroup,
        event: &str,
        payload: JsonValue,
    ) -> Result<(), ClearanceError> {
        let mut registry = self.registry.write().await;
        let Some(members) = registry.members.get(&group) else {
            return Ok(());
        };

        let message = SessionEvent {
            event: event.to_string(),
            payload,
        };

        let mut dead = Vec::new();
        for session_id in members {
            match registry.senders.get(session_id) {
                Some(tx) if tx.send(message.clone()).is_ok() => {}
                _ => dead.push(session_id.clone()),
            }
        }

        // prune sessions whose receiver is gone
        for session_id in dead {
            tracing::debug!(
                session_id = session_id.as_str(),
                group = %group,
                event = "session_pruned",
                "Dropping disconnected session"
            );
            registry.senders.remove(&session_id);
            for members in registry.members.values_mut() {
                members.remove(&session_id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_emit_reaches_joined_sessions_only() {
        let transport = InMemoryBroadcastTransport::new();

        let mut examiner_rx = transport.attach("terminal-1").await;
        let mut admin_rx = transport.attach("dashboard-1").await;
        transport
            .join("terminal-1", SessionGroup::Examiners)
            .await
            .unwrap();
        transport
            .join("dashboard-1", SessionGroup::Admins)
            .await
            .unwrap();

        transport
            .emit(SessionGroup::Examiners, "gate.decision", json!({"n": 1}))
            .await
            .unwrap();

        let event = examiner_rx.recv().await.unwrap();
        assert_eq!(event.event, "gate.decision");
        assert_eq!(event.payload, json!({"n": 1}));
        assert!(admin_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_join_requires_attached_channel() {
        let transport = InMemoryBroadcastTransport::new();
        let result = transport.join("ghost", SessionGroup::Admins).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_no_backlog_for_late_joiners() {
        let transport = InMemoryBroadcastTransport::new();

        transport
            .emit(SessionGroup::Admins, "gate.decision", json!({"n": 1}))
            .await
            .unwrap();

        let mut rx = transport.attach("late").await;
        transport.join("late", SessionGroup::Admins).await.unwrap();
        assert!(rx.try_recv().is_err());

        transport
            .emit(SessionGroup::Admins, "gate.decision", json!({"n": 2}))
            .await
            .unwrap();
        assert_eq!(rx.recv().await.unwrap().payload, json!({"n": 2}));
    }

    #[tokio::test]
    async fn test_disconnected_sessions_are_pruned() {
        let transport = InMemoryBroadcastTransport::new();

        let rx = transport.attach("flaky").await;
        transport.join("flaky", SessionGroup::Examiners).await.unwrap();
        drop(rx);

        // emit survives the dead receiver and prunes it
        transport
            .emit(SessionGroup::Examiners, "gate.decision", json!({}))
            .await
            .unwrap();

        let registry = transport.registry.read().await;
        assert!(!registry.senders.contains_key("flaky"));
        assert!(registry
            .members
            .get(&SessionGroup::Examiners)
            .map_or(true, |m| m.is_empty()));
    }

    #[tokio::test]
    async fn test_session_in_both_groups_receives_each_emit() {
        let transport = InMemoryBroadcastTransport::new();

        let mut rx = transport.attach("registrar").await;
        transport
            .join("registrar", SessionGroup::Examiners)
            .await
            .unwrap();
        transport
            .join("registrar", SessionGroup::Admins)
            .await
            .unwrap();

        transport
            .emit(SessionGroup::Examiners, "gate.decision", json!({"n": 1}))
            .await
            .unwrap();
        transport
            .emit(SessionGroup::Admins, "gate.decision", json!({"n": 1}))
            .await
            .unwrap();

        // at-least-once per group emit, so two deliveries
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }
}
