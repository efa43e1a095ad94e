//! Payment gateway configuration

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// Default bound on a single gateway verification call, in seconds
pub const DEFAULT_PAYMENT_TIMEOUT_SECS: u64 = 10;

/// Payment gateway configuration
///
/// `test_mode` is environment-scoped: it can only be enabled outside
/// production, so the gateway bypass reference is never honored on a
/// production configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    /// Gateway API base URL
    pub base_url: String,

    /// Gateway API secret key
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// Upper bound on a single verification call, in seconds
    pub timeout_secs: u64,

    /// Accept the designated test reference without calling the gateway
    pub test_mode: bool,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.paystack.co"),
            secret_key: String::new(),
            timeout_secs: DEFAULT_PAYMENT_TIMEOUT_SECS,
            test_mode: false,
        }
    }
}

impl PaymentConfig {
    /// Load gateway settings from environment variables
    ///
    /// `PAYMENT_TEST_MODE=1` is only honored outside production.
    pub fn from_env(env: Environment) -> Self {
        let base_url = std::env::var("PAYMENT_BASE_URL")
            .unwrap_or_else(|_| "https://api.paystack.co".to_string());
        let secret_key = std::env::var("PAYMENT_SECRET_KEY").unwrap_or_default();
        let timeout_secs = std::env::var("PAYMENT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PAYMENT_TIMEOUT_SECS);
        let requested_test_mode = std::env::var("PAYMENT_TEST_MODE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            base_url,
            secret_key,
            timeout_secs,
            test_mode: requested_test_mode && !env.is_production(),
        }
    }

    /// Timeout as a `std::time::Duration`
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
