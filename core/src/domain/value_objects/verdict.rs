//! Verdict produced by the verification engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::student::Student;

use super::reason::ReasonCode;

/// Display profile shown to the operator before committing a decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Student identifier
    pub student_id: Uuid,
    /// Matriculation number
    pub matric_number: String,
    /// Full name
    pub full_name: String,
    /// Department
    pub department: String,
    /// Faculty
    pub faculty: String,
    /// Photograph reference for the visual check
    pub photo_url: Option<String>,
}

impl From<&Student> for StudentProfile {
    fn from(student: &Student) -> Self {
        Self {
            student_id: student.id,
            matric_number: student.matric_number.clone(),
            full_name: student.full_name.clone(),
            department: student.department.clone(),
            faculty: student.faculty.clone(),
            photo_url: student.photo_url.clone(),
        }
    }
}

/// Outcome of the verification rule chain
///
/// An admit verdict is a read-only preview; nothing is consumed until the
/// decision is committed through the audit recorder. Denials carry the
/// specific reason code, never a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Verdict {
    Admit { profile: StudentProfile },
    Deny { reason: ReasonCode },
}

impl Verdict {
    /// Shorthand for a denial
    pub fn deny(reason: ReasonCode) -> Self {
        Self::Deny { reason }
    }

    /// Whether the chain passed
    pub fn is_admit(&self) -> bool {
        matches!(self, Self::Admit { .. })
    }

    /// The denial reason, if any
    pub fn reason(&self) -> Option<&ReasonCode> {
        match self {
            Self::Admit { .. } => None,
            Self::Deny { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_student() {
        let mut student =
            Student::new("ENG/2019/043", "Adaeze Obi", "Civil Engineering", "Engineering");
        student.photo_url = Some("photos/adaeze.jpg".to_string());

        let profile = StudentProfile::from(&student);
        assert_eq!(profile.student_id, student.id);
        assert_eq!(profile.photo_url.as_deref(), Some("photos/adaeze.jpg"));
    }

    #[test]
    fn test_verdict_accessors() {
        let deny = Verdict::deny(ReasonCode::TokenMismatch);
        assert!(!deny.is_admit());
        assert_eq!(deny.reason(), Some(&ReasonCode::TokenMismatch));
    }

    #[test]
    fn test_verdict_envelope_serialization() {
        let json = serde_json::to_value(Verdict::deny(ReasonCode::IdentityNotFound)).unwrap();
        assert_eq!(json["decision"], "deny");
        assert_eq!(json["reason"]["code"], "identity_not_found");
    }
}
