//! Reason codes surfaced with every refusal and denial.
//!
//! Callers must surface the specific code, never a generic failure string.
//! The engine codes come out of the ordered rule chain; the operator codes
//! are committed by an examiner after a visual check of an admissible pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a presentation or issuance attempt did not end in success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ReasonCode {
    /// Pass could not be authenticated or decoded
    InvalidSignature,
    /// Pass was sealed by a different authority
    IssuerMismatch,
    /// Pass references a student that does not exist
    StudentNotFound,
    /// Presented token is not the student's current token
    TokenMismatch,
    /// Examination fee has not been verified
    PaymentNotVerified,
    /// Registration has not been completed
    RegistrationIncomplete,
    /// Token was already consumed at a gate
    AlreadyUsed {
        /// When the original admission happened
        used_at: Option<DateTime<Utc>>,
    },
    /// Manual lookup matched no student
    IdentityNotFound,
    /// Issuance refused: clearance preconditions not met
    ClearanceIncomplete,

    // Operator denial set, committed after visual inspection
    /// Photograph does not match the bearer
    PhotoMismatch,
    /// Pass is no longer acceptable for this sitting
    ExpiredPass,
    /// Student is assigned to a different venue
    WrongVenue,
    /// Any other operator-stated ground, carried in the record note
    Other,
}

impl ReasonCode {
    /// Stable machine-readable wire code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_signature",
            Self::IssuerMismatch => "issuer_mismatch",
            Self::StudentNotFound => "student_not_found",
            Self::TokenMismatch => "token_mismatch",
            Self::PaymentNotVerified => "payment_not_verified",
            Self::RegistrationIncomplete => "registration_incomplete",
            Self::AlreadyUsed { .. } => "already_used",
            Self::IdentityNotFound => "identity_not_found",
            Self::ClearanceIncomplete => "clearance_incomplete",
            Self::PhotoMismatch => "photo_mismatch",
            Self::ExpiredPass => "expired_pass",
            Self::WrongVenue => "wrong_venue",
            Self::Other => "other",
        }
    }

    /// Human-readable message shown to the operator
    pub fn message(&self) -> String {
        match self {
            Self::InvalidSignature => "Pass failed authentication".to_string(),
            Self::IssuerMismatch => "Pass was not issued by this authority".to_string(),
            Self::StudentNotFound => "Pass references an unknown student".to_string(),
            Self::TokenMismatch => "Pass does not match the student's current token".to_string(),
            Self::PaymentNotVerified => "Examination fee has not been verified".to_string(),
            Self::RegistrationIncomplete => "Registration has not been completed".to_string(),
            Self::AlreadyUsed { used_at: Some(at) } => {
                format!("Pass was already admitted at {}", at.to_rfc3339())
            }
            Self::AlreadyUsed { used_at: None } => "Pass was already admitted".to_string(),
            Self::IdentityNotFound => "No student matches that identifier".to_string(),
            Self::ClearanceIncomplete => "Student has not completed clearance".to_string(),
            Self::PhotoMismatch => "Photograph does not match the bearer".to_string(),
            Self::ExpiredPass => "Pass is no longer valid for this sitting".to_string(),
            Self::WrongVenue => "Student is assigned to a different venue".to_string(),
            Self::Other => "Denied by the examiner".to_string(),
        }
    }

    /// Whether this code belongs to the operator denial set
    pub fn is_operator_code(&self) -> bool {
        matches!(
            self,
            Self::PhotoMismatch | Self::ExpiredPass | Self::WrongVenue | Self::Other
        )
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
