//! Verification record entity: the immutable audit trail of gate decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::reason::ReasonCode;

/// Terminal decision committed for a presentation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Admit,
    Deny,
}

impl Decision {
    /// Stable string form for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admit => "admit",
            Self::Deny => "deny",
        }
    }

    /// Parse from the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admit" => Some(Self::Admit),
            "deny" => Some(Self::Deny),
            _ => None,
        }
    }
}

/// One row of the append-only gate audit trail
///
/// Records are never updated or deleted after creation. Every presentation
/// attempt produces exactly one record, whatever its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Examiner who operated the terminal
    pub examiner_id: Uuid,

    /// Student the attempt resolved to, when one was identified
    pub student_id: Option<Uuid>,

    /// The committed decision
    pub decision: Decision,

    /// Reason for a denial; `None` on admit
    pub reason: Option<ReasonCode>,

    /// Hall the student was admitted into; `None` on deny
    pub hall: Option<String>,

    /// Free-text operator note, if any
    pub note: Option<String>,

    /// When the decision was committed
    pub recorded_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Build an admit record for a hall assignment
    pub fn admit(examiner_id: Uuid, student_id: Uuid, hall: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            examiner_id,
            student_id: Some(student_id),
            decision: Decision::Admit,
            reason: None,
            hall: Some(hall.into()),
            note: None,
            recorded_at: Utc::now(),
        }
    }

    /// Build a deny record with a reason code
    pub fn deny(
        examiner_id: Uuid,
        student_id: Option<Uuid>,
        reason: ReasonCode,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            examiner_id,
            student_id,
            decision: Decision::Deny,
            reason: Some(reason),
            hall: None,
            note,
            recorded_at: Utc::now(),
        }
    }

    /// Whether this record committed an admission
    pub fn is_admit(&self) -> bool {
        self.decision == Decision::Admit
    }
}
