//! Gateway trait abstracting the payment provider's verification call.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::errors::ClearanceError;

/// Result of a gateway verification call
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// Whether the gateway reports the transaction as successful
    pub success: bool,
    /// The gateway's raw response body, kept for the audit log
    pub raw: JsonValue,
}

/// Trait for payment gateway integration
///
/// Implementations perform one verification round trip. Timeout policy is
/// applied by the caller, not here.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Verify a transaction reference with the provider
    async fn verify(&self, reference: &str) -> Result<PaymentOutcome, ClearanceError>;
}
