//! Transport trait for session fan-out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::errors::ClearanceError;

/// Dashboard session groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionGroup {
    /// Gate terminal operators
    Examiners,
    /// Administrative dashboards
    Admins,
}

impl SessionGroup {
    /// Stable channel name for the transport
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Examiners => "examiners",
            Self::Admins => "admins",
        }
    }
}

impl std::fmt::Display for SessionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.channel())
    }
}

/// Trait for the session transport behind the broadcaster
///
/// Delivery is best-effort and unordered across sessions. There is no
/// backlog: a session joining after an event was emitted never receives it
/// and must pull recent history from the read side instead.
#[async_trait]
pub trait BroadcastTransport: Send + Sync {
    /// Register a session in a group
    async fn join(&self, session_id: &str, group: SessionGroup) -> Result<(), ClearanceError>;

    /// Emit an event to every session currently in a group
    async fn emit(
        &self,
        group: SessionGroup,
        event: &str,
        payload: JsonValue,
    ) -> Result<(), ClearanceError>;
}
