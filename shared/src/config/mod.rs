//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection and logging configuration
//! - `database` - Database connection and pool configuration
//! - `pass_key` - AEAD key material for sealing clearance passes
//! - `payment` - Payment gateway credentials and timeout policy

pub mod database;
pub mod environment;
pub mod pass_key;
pub mod payment;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use pass_key::PassKeyConfig;
pub use payment::PaymentConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Pass sealing key configuration
    pub pass_key: PassKeyConfig,

    /// Payment gateway configuration
    pub payment: PaymentConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// The payment section is environment-scoped: a production environment
    /// can never enable the gateway test mode, regardless of what the
    /// process environment says.
    pub fn from_env() -> Result<Self, crate::errors::ConfigError> {
        let env = Environment::from_env();
        Ok(Self {
            environment: env,
            database: DatabaseConfig::from_env(),
            pass_key: PassKeyConfig::from_env()?,
            payment: PaymentConfig::from_env(env),
            logging: LoggingConfig::for_environment(env),
        })
    }
}
