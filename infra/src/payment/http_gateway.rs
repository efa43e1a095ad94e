//! HTTP implementation of the PaymentGateway trait.
//!
//! Speaks the gateway's transaction-verification endpoint
//! (`GET /transaction/verify/{reference}` with bearer authentication).
//! Transport faults and 5xx responses are upstream errors; a well-formed
//! answer that does not confirm the transaction is an ordinary unsuccessful
//! outcome. The caller applies the bounded timeout on top of the client's
//! own request timeout.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use eg_core::errors::ClearanceError;
use eg_core::services::payment::{PaymentGateway, PaymentOutcome};
use eg_shared::config::payment::PaymentConfig;

/// HTTP client for the payment provider
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    /// Create a gateway client from configuration
    pub fn new(config: &PaymentConfig) -> Result<Self, ClearanceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClearanceError::upstream(format!("failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    fn verify_url(&self, reference: &str) -> String {
        format!("{}/transaction/verify/{}", self.base_url, reference)
    }

    /// Whether the gateway's body confirms the transaction
    ///
    /// The provider reports `{"status": true, "data": {"status": "success"}}`
    /// on a settled transaction; anything else is unsuccessful.
    fn is_successful(body: &JsonValue) -> bool {
        body["status"] == JsonValue::Bool(true) && body["data"]["status"] == "success"
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn verify(&self, reference: &str) -> Result<PaymentOutcome, ClearanceError> {
        let response = self
            .client
            .get(self.verify_url(reference))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    event = "payment_gateway_unreachable",
                    "Gateway request failed"
                );
                ClearanceError::upstream(format!("payment gateway unreachable: {}", e))
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ClearanceError::upstream(format!(
                "payment gateway returned {}",
                status
            )));
        }

        let body: JsonValue = response.json().await.map_err(|e| {
            ClearanceError::upstream(format!("unreadable gateway response: {}", e))
        })?;

        let success = status.is_success() && Self::is_successful(&body);
        tracing::debug!(
            success = success,
            http_status = %status,
            event = "payment_gateway_answered",
            "Gateway verification completed"
        );

        Ok(PaymentOutcome { success, raw: body })
    }
}
