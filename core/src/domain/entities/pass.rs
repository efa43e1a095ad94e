//! Clearance pass payload and token minting.

use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::student::Student;

/// Issuing-authority marker embedded in every sealed pass
pub const PASS_ISSUER: &str = "examgate";

/// Token entropy in bytes (128 bits, hex encoded to 32 characters)
pub const TOKEN_BYTES: usize = 16;

/// Mint a fresh clearance token from the OS CSPRNG
pub fn mint_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// The plaintext structure sealed into a clearance pass
///
/// Display fields are carried inside the pass so a gate terminal can render
/// the student's profile without a round trip; the authoritative state is
/// still read from the repository during verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearancePayload {
    /// Student this pass is bound to
    pub student_id: Uuid,

    /// Matriculation number for display
    pub matric_number: String,

    /// Full name for display
    pub full_name: String,

    /// Department for display
    pub department: String,

    /// Faculty for display
    pub faculty: String,

    /// Photograph reference for display
    pub photo_url: Option<String>,

    /// The single-use clearance token
    pub token: String,

    /// Issuing-authority marker, checked during verification
    pub issuer: String,

    /// When this pass was issued
    pub issued_at: DateTime<Utc>,
}

impl ClearancePayload {
    /// Build a payload binding the given token to a student
    pub fn new(student: &Student, token: impl Into<String>) -> Self {
        Self {
            student_id: student.id,
            matric_number: student.matric_number.clone(),
            full_name: student.full_name.clone(),
            department: student.department.clone(),
            faculty: student.faculty.clone(),
            photo_url: student.photo_url.clone(),
            token: token.into(),
            issuer: PASS_ISSUER.to_string(),
            issued_at: Utc::now(),
        }
    }
}
