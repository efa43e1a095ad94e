//! Verification engine implementation.
//!
//! The rule order is part of the contract: when several conditions fail at
//! once, the first failing rule decides which reason code surfaces. The
//! chain never mutates state; an admit verdict is a preview, and
//! consumption happens only when the decision is committed.

use constant_time_eq::constant_time_eq;
use std::sync::Arc;

use crate::domain::entities::pass::PASS_ISSUER;
use crate::domain::entities::student::Student;
use crate::domain::value_objects::reason::ReasonCode;
use crate::domain::value_objects::verdict::{StudentProfile, Verdict};
use crate::errors::ClearanceResult;
use crate::repositories::StudentRepository;
use crate::services::codec::PassCodec;
use crate::services::presentation::Candidate;

/// Read-only rule chain producing a verdict for every candidate
pub struct VerificationEngine<S, C>
where
    S: StudentRepository,
    C: PassCodec,
{
    students: Arc<S>,
    codec: Arc<C>,
}

impl<S, C> VerificationEngine<S, C>
where
    S: StudentRepository,
    C: PassCodec,
{
    /// Create a new engine
    pub fn new(students: Arc<S>, codec: Arc<C>) -> Self {
        Self { students, codec }
    }

    /// Run the candidate through the rule chain
    ///
    /// Business denials come back as `Ok(Verdict::Deny ..)`; only
    /// infrastructure faults (storage unreachable) surface as `Err`.
    pub async fn verify(&self, candidate: &Candidate) -> ClearanceResult<Verdict> {
        let verdict = match candidate {
            Candidate::Unmatched { .. } => Verdict::deny(ReasonCode::IdentityNotFound),

            Candidate::Sealed(sealed) => {
                // 1. authenticity
                let payload = match self.codec.open(sealed) {
                    Ok(payload) => payload,
                    Err(_) => return Ok(self.denied(Verdict::deny(ReasonCode::InvalidSignature))),
                };

                // 2. issuing authority
                if payload.issuer != PASS_ISSUER {
                    return Ok(self.denied(Verdict::deny(ReasonCode::IssuerMismatch)));
                }

                // 3. referenced student exists
                let student = match self.students.find_by_id(payload.student_id).await? {
                    Some(student) => student,
                    None => return Ok(self.denied(Verdict::deny(ReasonCode::StudentNotFound))),
                };

                // 4..7
                self.check_student(&student, Some(payload.token.as_str()))
            }

            // manual path: the student is already resolved, so the chain
            // starts at the token rules
            Candidate::Identified(student) => {
                self.check_student(student, student.clearance_token.as_deref())
            }
        };

        Ok(self.denied(verdict))
    }

    /// Rules 4 through 7, shared by both capture paths
    fn check_student(&self, student: &Student, presented: Option<&str>) -> Verdict {
        // 4. presented token equals the student's current token
        let token_matches = match (presented, student.clearance_token.as_deref()) {
            (Some(presented), Some(current)) => {
                constant_time_eq(presented.as_bytes(), current.as_bytes())
            }
            _ => false,
        };
        if !token_matches {
            return Verdict::deny(ReasonCode::TokenMismatch);
        }

        // 5. fee verified
        if !student.payment_verified {
            return Verdict::deny(ReasonCode::PaymentNotVerified);
        }

        // 6. registration complete
        if !student.registration_complete {
            return Verdict::deny(ReasonCode::RegistrationIncomplete);
        }

        // 7. token not yet consumed
        if student.token_used {
            return Verdict::deny(ReasonCode::AlreadyUsed {
                used_at: student.token_used_at,
            });
        }

        Verdict::Admit {
            profile: StudentProfile::from(student),
        }
    }

    fn denied(&self, verdict: Verdict) -> Verdict {
        if let Some(reason) = verdict.reason() {
            tracing::info!(
                reason = %reason,
                event = "verification_denied",
                "Rule chain produced a denial"
            );
        }
        verdict
    }
}
