//! # ExamGate Core
//!
//! Core business logic and domain layer for the ExamGate backend.
//! This crate contains the clearance-token lifecycle: pass sealing,
//! issuance, presentation capture, the verification rule chain, decision
//! recording, and dashboard fan-out, together with the repository
//! interfaces those services depend on.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
