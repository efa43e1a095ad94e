//! Shared utilities and common types for the ExamGate backend
//!
//! This crate provides functionality used across the server workspace:
//! - Configuration types (environment, database, pass key, payment gateway)
//! - The standard response envelope
//! - Utility functions (matriculation number validation)

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, LoggingConfig, PassKeyConfig, PaymentConfig,
};
pub use errors::ConfigError;
pub use types::ApiResponse;
pub use utils::matric;
