//! Process configuration bootstrap.

use eg_shared::config::AppConfig;
use eg_shared::errors::ConfigError;

/// Load the application configuration, reading a `.env` file when present
///
/// Missing `.env` files are ignored; a present but malformed one is not.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    AppConfig::from_env()
}
