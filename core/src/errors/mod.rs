//! Domain-specific error types and error handling.
//!
//! Expected business outcomes (denials, refusals, race losses) are returned
//! as data; see [`crate::domain::value_objects::Verdict`] and
//! [`crate::domain::value_objects::ReasonCode`]. The types here cover
//! everything else: infrastructure faults and caller mistakes that the
//! presentation layer converts into a generic "service unavailable" while
//! logging the detail internally.

mod types;

pub use types::{CodecError, IssuanceError};

use thiserror::Error;

/// Infrastructure and authorization failures in the clearance subsystem
#[derive(Error, Debug)]
pub enum ClearanceError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error("role {role} is not permitted to commit decisions")]
    Forbidden { role: String },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("crypto configuration error: {message}")]
    Crypto { message: String },

    #[error("upstream service unavailable: {message}")]
    Upstream { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ClearanceError {
    /// Convenience constructor for storage faults
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Convenience constructor for crypto faults
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto {
            message: message.into(),
        }
    }

    /// Convenience constructor for upstream faults
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}

pub type ClearanceResult<T> = Result<T, ClearanceError>;
