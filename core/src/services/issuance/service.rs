//! Clearance issuer implementation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::pass::{mint_token, ClearancePayload};
use crate::errors::IssuanceError;
use crate::repositories::StudentRepository;
use crate::services::codec::PassCodec;

/// Issuance envelope: the payload and its sealed, barcode-ready form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedPass {
    /// The plaintext payload, for rendering the pass
    pub payload: ClearancePayload,
    /// The sealed opaque string encoded into the 2-D barcode
    pub sealed: String,
}

/// Service minting single-use clearance tokens
///
/// Issuance is idempotent: while a student's token is unconsumed, repeated
/// calls return the same token, so passes rendered earlier stay valid.
pub struct ClearanceIssuer<S, C>
where
    S: StudentRepository,
    C: PassCodec,
{
    students: Arc<S>,
    codec: Arc<C>,
}

impl<S, C> ClearanceIssuer<S, C>
where
    S: StudentRepository,
    C: PassCodec,
{
    /// Create a new issuer
    pub fn new(students: Arc<S>, codec: Arc<C>) -> Self {
        Self { students, codec }
    }

    /// Issue a pass for a student, reusing their existing token if one exists
    ///
    /// # Returns
    /// * `Ok(IssuedPass)` - Pass issued or re-rendered
    /// * `Err(IssuanceError::StudentNotFound)` - Unknown student
    /// * `Err(IssuanceError::ClearanceIncomplete)` - Registration or payment pending
    pub async fn issue_or_reuse(&self, student_id: Uuid) -> Result<IssuedPass, IssuanceError> {
        let student = self
            .students
            .find_by_id(student_id)
            .await?
            .ok_or(IssuanceError::StudentNotFound)?;

        if !student.has_clearance() {
            tracing::info!(
                student_id = %student_id,
                registration_complete = student.registration_complete,
                payment_verified = student.payment_verified,
                event = "issuance_refused",
                "Clearance preconditions not met"
            );
            return Err(IssuanceError::ClearanceIncomplete);
        }

        let token = match &student.clearance_token {
            Some(existing) => {
                tracing::debug!(
                    student_id = %student_id,
                    event = "token_reused",
                    "Reusing existing clearance token"
                );
                existing.clone()
            }
            None => {
                let minted = mint_token();
                self.students.set_token(student_id, &minted).await?;
                tracing::info!(
                    student_id = %student_id,
                    event = "token_minted",
                    "Minted new clearance token"
                );
                minted
            }
        };

        let payload = ClearancePayload::new(&student, token);
        let sealed = self.codec.seal(&payload)?;
        Ok(IssuedPass { payload, sealed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::student::Student;
    use crate::repositories::MockStudentRepository;
    use crate::services::codec::{AesGcmPassCodec, PassCodec};

    fn issuer_fixture() -> (
        ClearanceIssuer<MockStudentRepository, AesGcmPassCodec>,
        Arc<MockStudentRepository>,
        Arc<AesGcmPassCodec>,
    ) {
        let students = Arc::new(MockStudentRepository::new());
        let codec = Arc::new(AesGcmPassCodec::new(&[9u8; 32]).unwrap());
        let issuer = ClearanceIssuer::new(students.clone(), codec.clone());
        (issuer, students, codec)
    }

    fn cleared_student() -> Student {
        let mut student =
            Student::new("ENG/2019/043", "Adaeze Obi", "Civil Engineering", "Engineering");
        student.complete_registration();
        student.mark_payment_verified();
        student
    }

    #[tokio::test]
    async fn test_issue_mints_and_persists_token() {
        let (issuer, students, codec) = issuer_fixture();
        let student = cleared_student();
        let id = student.id;
        students.insert(student).await;

        let pass = issuer.issue_or_reuse(id).await.unwrap();

        let stored = students.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.clearance_token.as_deref(), Some(pass.payload.token.as_str()));
        assert_eq!(codec.open(&pass.sealed).unwrap(), pass.payload);
    }

    #[tokio::test]
    async fn test_issuance_is_idempotent_before_consumption() {
        let (issuer, students, _) = issuer_fixture();
        let student = cleared_student();
        let id = student.id;
        students.insert(student).await;

        let first = issuer.issue_or_reuse(id).await.unwrap();
        let second = issuer.issue_or_reuse(id).await.unwrap();
        assert_eq!(first.payload.token, second.payload.token);
    }

    #[tokio::test]
    async fn test_registration_incomplete_refuses_issuance() {
        let (issuer, students, _) = issuer_fixture();
        let mut student = cleared_student();
        student.registration_complete = false;
        let id = student.id;
        students.insert(student).await;

        let result = issuer.issue_or_reuse(id).await;
        assert!(matches!(result, Err(IssuanceError::ClearanceIncomplete)));
    }

    #[tokio::test]
    async fn test_payment_unverified_refuses_issuance() {
        let (issuer, students, _) = issuer_fixture();
        let mut student = cleared_student();
        student.payment_verified = false;
        let id = student.id;
        students.insert(student).await;

        let result = issuer.issue_or_reuse(id).await;
        assert!(matches!(result, Err(IssuanceError::ClearanceIncomplete)));
    }

    #[tokio::test]
    async fn test_unknown_student() {
        let (issuer, _, _) = issuer_fixture();
        let result = issuer.issue_or_reuse(Uuid::new_v4()).await;
        assert!(matches!(result, Err(IssuanceError::StudentNotFound)));
    }
}
