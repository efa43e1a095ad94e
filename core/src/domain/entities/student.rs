//! Student entity as seen by the clearance subsystem.
//!
//! Registration owns the identity and clearance flags; this subsystem owns
//! the token fields (`clearance_token`, `token_used`, `token_used_at`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered student and their clearance state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier for the student
    pub id: Uuid,

    /// Matriculation number (stored uppercase, looked up case-insensitively)
    pub matric_number: String,

    /// Full display name
    pub full_name: String,

    /// Department name
    pub department: String,

    /// Faculty name
    pub faculty: String,

    /// Reference to the student's photograph, if one was uploaded
    pub photo_url: Option<String>,

    /// Whether registration has been completed
    pub registration_complete: bool,

    /// Whether the examination fee payment has been verified
    pub payment_verified: bool,

    /// The current clearance token, if one has been issued
    pub clearance_token: Option<String>,

    /// Whether the current token has been consumed at a gate
    pub token_used: bool,

    /// When the token was consumed
    pub token_used_at: Option<DateTime<Utc>>,

    /// Timestamp when the student record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the student record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Creates a new Student instance with clearance pending
    pub fn new(
        matric_number: impl Into<String>,
        full_name: impl Into<String>,
        department: impl Into<String>,
        faculty: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            matric_number: matric_number.into().to_uppercase(),
            full_name: full_name.into(),
            department: department.into(),
            faculty: faculty.into(),
            photo_url: None,
            registration_complete: false,
            payment_verified: false,
            clearance_token: None,
            token_used: false,
            token_used_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Both clearance preconditions hold
    pub fn has_clearance(&self) -> bool {
        self.registration_complete && self.payment_verified
    }

    /// The current token, if issued and not yet consumed
    pub fn live_token(&self) -> Option<&str> {
        if self.token_used {
            None
        } else {
            self.clearance_token.as_deref()
        }
    }

    /// Marks registration as complete
    pub fn complete_registration(&mut self) {
        self.registration_complete = true;
        self.updated_at = Utc::now();
    }

    /// Marks the examination fee as verified
    pub fn mark_payment_verified(&mut self) {
        self.payment_verified = true;
        self.updated_at = Utc::now();
    }

    /// Binds a freshly minted token to the student
    pub fn assign_token(&mut self, token: impl Into<String>) {
        self.clearance_token = Some(token.into());
        self.token_used = false;
        self.token_used_at = None;
        self.updated_at = Utc::now();
    }

    /// Consumes the current token at the given instant
    ///
    /// Callers go through the repository's conditional write in real flows;
    /// this mutator exists for in-memory state transitions.
    pub fn consume_token(&mut self, at: DateTime<Utc>) {
        self.token_used = true;
        self.token_used_at = Some(at);
        self.updated_at = at;
    }
}
