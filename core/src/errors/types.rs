//! Specific error types for pass sealing and issuance.

use thiserror::Error;

use super::ClearanceError;

/// The codec's single failure kind
///
/// Corruption, tampering, a wrong key, and malformed plaintext after
/// decryption are indistinguishable by design; nothing about the cause
/// leaks to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("pass failed authentication")]
    InvalidSignature,
}

/// Issuance refusals and faults
#[derive(Error, Debug)]
pub enum IssuanceError {
    #[error("student has not completed clearance")]
    ClearanceIncomplete,

    #[error("student not found")]
    StudentNotFound,

    #[error(transparent)]
    Infra(#[from] ClearanceError),
}

impl IssuanceError {
    /// Stable wire code for the refusal, when this is a business outcome
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::ClearanceIncomplete => Some("clearance_incomplete"),
            Self::StudentNotFound => Some("student_not_found"),
            Self::Infra(_) => None,
        }
    }
}
