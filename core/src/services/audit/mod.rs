//! Audit recorder: the single commit point for gate decisions.

mod service;

pub use service::{AuditRecorder, DecisionInput};
