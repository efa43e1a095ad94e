//! Database access: connection pooling and MySQL repository implementations.

pub mod mysql;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use eg_core::errors::ClearanceError;
use eg_shared::config::database::DatabaseConfig;

/// Build a MySQL connection pool from configuration
pub async fn connect(config: &DatabaseConfig) -> Result<MySqlPool, ClearanceError> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .connect(&config.url)
        .await
        .map_err(|e| ClearanceError::storage(format!("failed to connect to database: {}", e)))
}
