//! Authenticated operator identity supplied by the auth layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Operates gate terminals and commits decisions
    Examiner,
    /// Full access, including committing decisions
    Admin,
    /// Dashboard-only session; may observe but never commit
    Viewer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Examiner => write!(f, "examiner"),
            Role::Admin => write!(f, "admin"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

/// Identity and role attached to every call into the audit recorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExaminerContext {
    /// Operator identifier
    pub id: Uuid,
    /// Display name for the audit trail
    pub name: String,
    /// Session role
    pub role: Role,
}

impl ExaminerContext {
    /// Create a context for an authenticated operator
    pub fn new(id: Uuid, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    /// Whether this session may commit admit/deny decisions
    pub fn can_commit(&self) -> bool {
        matches!(self.role, Role::Examiner | Role::Admin)
    }
}
