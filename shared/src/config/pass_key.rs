//! Pass sealing key configuration

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Required key length for AES-256-GCM
pub const PASS_KEY_LEN: usize = 32;

/// Configuration holding the server-side key that seals clearance passes
///
/// The key is carried base64-encoded and validated for length when decoded.
/// It never appears in logs or serialized output.
#[derive(Clone, Deserialize, Serialize)]
pub struct PassKeyConfig {
    /// Base64-encoded 32-byte key
    #[serde(skip_serializing)]
    pub key_base64: String,
}

impl PassKeyConfig {
    /// Create a configuration from an already-encoded key
    pub fn new(key_base64: impl Into<String>) -> Self {
        Self {
            key_base64: key_base64.into(),
        }
    }

    /// Load the key from the `PASS_SECRET_KEY` environment variable
    pub fn from_env() -> Result<Self, ConfigError> {
        let key_base64 =
            std::env::var("PASS_SECRET_KEY").map_err(|_| ConfigError::MissingVariable {
                name: "PASS_SECRET_KEY".to_string(),
            })?;
        let config = Self { key_base64 };
        config.decode()?;
        Ok(config)
    }

    /// Decode and validate the key material
    pub fn decode(&self) -> Result<Vec<u8>, ConfigError> {
        let key = BASE64
            .decode(self.key_base64.trim())
            .map_err(|e| ConfigError::invalid("PASS_SECRET_KEY", e.to_string()))?;
        if key.len() != PASS_KEY_LEN {
            return Err(ConfigError::invalid(
                "PASS_SECRET_KEY",
                format!("expected {} bytes, got {}", PASS_KEY_LEN, key.len()),
            ));
        }
        Ok(key)
    }
}

impl std::fmt::Debug for PassKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassKeyConfig")
            .field("key_base64", &"<redacted>")
            .finish()
    }
}
