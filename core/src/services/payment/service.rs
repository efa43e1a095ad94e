//! Payment confirmation service.
//!
//! Wraps the gateway call in a bounded timeout with fail-closed semantics:
//! a timeout or transport fault is an upstream error, never an implicit
//! success. A declined transaction is an ordinary returned outcome.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use eg_shared::config::payment::PaymentConfig;

use crate::errors::{ClearanceError, ClearanceResult};
use crate::repositories::StudentRepository;

use super::gateway::PaymentGateway;

/// Reference accepted without a gateway round trip when test mode is on
///
/// Test mode is environment-scoped in `PaymentConfig`; a production
/// configuration can never enable it.
pub const TEST_REFERENCE: &str = "EG-TEST-REF";

/// Outcome of a payment confirmation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Gateway confirmed the transaction; the student's flag is now set
    Confirmed,
    /// Gateway answered but did not confirm the transaction
    Declined,
}

/// Service confirming examination fee payments
pub struct PaymentService<G, S>
where
    G: PaymentGateway,
    S: StudentRepository,
{
    gateway: Arc<G>,
    students: Arc<S>,
    config: PaymentConfig,
}

impl<G, S> PaymentService<G, S>
where
    G: PaymentGateway,
    S: StudentRepository,
{
    /// Create a new payment service
    pub fn new(gateway: Arc<G>, students: Arc<S>, config: PaymentConfig) -> Self {
        Self {
            gateway,
            students,
            config,
        }
    }

    /// Confirm a transaction reference and mark the student's fee verified
    ///
    /// # Returns
    /// * `Ok(PaymentStatus::Confirmed)` - Verified and flag persisted
    /// * `Ok(PaymentStatus::Declined)` - Gateway did not confirm
    /// * `Err(ClearanceError::Upstream)` - Timeout or gateway unreachable
    pub async fn confirm(
        &self,
        student_id: Uuid,
        reference: &str,
    ) -> ClearanceResult<PaymentStatus> {
        if self.config.test_mode && reference == TEST_REFERENCE {
            tracing::warn!(
                student_id = %student_id,
                event = "payment_test_reference",
                "Accepting designated test reference without gateway call"
            );
            self.students.set_payment_verified(student_id).await?;
            return Ok(PaymentStatus::Confirmed);
        }

        let outcome = tokio::time::timeout(self.config.timeout(), self.gateway.verify(reference))
            .await
            .map_err(|_| {
                tracing::error!(
                    student_id = %student_id,
                    timeout_secs = self.config.timeout_secs,
                    event = "payment_gateway_timeout",
                    "Gateway verification timed out"
                );
                ClearanceError::upstream("payment gateway timed out")
            })??;

        if !outcome.success {
            tracing::info!(
                student_id = %student_id,
                event = "payment_declined",
                "Gateway did not confirm transaction"
            );
            return Ok(PaymentStatus::Declined);
        }

        self.students.set_payment_verified(student_id).await?;
        tracing::info!(
            student_id = %student_id,
            event = "payment_confirmed",
            "Examination fee verified"
        );
        Ok(PaymentStatus::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::student::Student;
    use crate::repositories::MockStudentRepository;
    use crate::services::payment::gateway::PaymentOutcome;
    use async_trait::async_trait;
    use std::time::Duration;

    struct ScriptedGateway {
        success: bool,
        delay: Duration,
    }

    #[async_trait]
    impl PaymentGateway for ScriptedGateway {
        async fn verify(&self, _reference: &str) -> Result<PaymentOutcome, ClearanceError> {
            tokio::time::sleep(self.delay).await;
            Ok(PaymentOutcome {
                success: self.success,
                raw: serde_json::json!({ "status": self.success }),
            })
        }
    }

    fn config(timeout_secs: u64, test_mode: bool) -> PaymentConfig {
        PaymentConfig {
            base_url: "http://gateway.test".to_string(),
            secret_key: "sk_test".to_string(),
            timeout_secs,
            test_mode,
        }
    }

    async fn seeded_repo() -> (Arc<MockStudentRepository>, Uuid) {
        let repo = Arc::new(MockStudentRepository::new());
        let mut student =
            Student::new("ENG/2019/043", "Adaeze Obi", "Civil Engineering", "Engineering");
        student.complete_registration();
        let id = student.id;
        repo.insert(student).await;
        (repo, id)
    }

    #[tokio::test]
    async fn test_confirmation_sets_flag() {
        let (repo, id) = seeded_repo().await;
        let gateway = Arc::new(ScriptedGateway {
            success: true,
            delay: Duration::ZERO,
        });
        let service = PaymentService::new(gateway, repo.clone(), config(5, false));

        let status = service.confirm(id, "TX-123").await.unwrap();
        assert_eq!(status, PaymentStatus::Confirmed);
        assert!(repo.find_by_id(id).await.unwrap().unwrap().payment_verified);
    }

    #[tokio::test]
    async fn test_decline_leaves_flag_unset() {
        let (repo, id) = seeded_repo().await;
        let gateway = Arc::new(ScriptedGateway {
            success: false,
            delay: Duration::ZERO,
        });
        let service = PaymentService::new(gateway, repo.clone(), config(5, false));

        let status = service.confirm(id, "TX-123").await.unwrap();
        assert_eq!(status, PaymentStatus::Declined);
        assert!(!repo.find_by_id(id).await.unwrap().unwrap().payment_verified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_closed() {
        let (repo, id) = seeded_repo().await;
        let gateway = Arc::new(ScriptedGateway {
            success: true,
            delay: Duration::from_secs(60),
        });
        let service = PaymentService::new(gateway, repo.clone(), config(1, false));

        let result = service.confirm(id, "TX-123").await;
        assert!(matches!(result, Err(ClearanceError::Upstream { .. })));
        assert!(!repo.find_by_id(id).await.unwrap().unwrap().payment_verified);
    }

    #[tokio::test]
    async fn test_test_reference_requires_test_mode() {
        let (repo, id) = seeded_repo().await;
        let gateway = Arc::new(ScriptedGateway {
            success: false,
            delay: Duration::ZERO,
        });

        // test mode off: the reference goes to the gateway and is declined
        let service = PaymentService::new(gateway.clone(), repo.clone(), config(5, false));
        let status = service.confirm(id, TEST_REFERENCE).await.unwrap();
        assert_eq!(status, PaymentStatus::Declined);

        // test mode on: accepted without a gateway round trip
        let service = PaymentService::new(gateway, repo.clone(), config(5, true));
        let status = service.confirm(id, TEST_REFERENCE).await.unwrap();
        assert_eq!(status, PaymentStatus::Confirmed);
    }
}
