//! Audit recorder implementation.
//!
//! Committing an admission consumes the token through the repository's
//! conditional write, the one serialization point in the system. The
//! audit row is inserted for every attempt whatever the outcome, and the
//! broadcast runs strictly after the insert: commit, then notify.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::domain::value_objects::examiner::ExaminerContext;
use crate::domain::value_objects::reason::ReasonCode;
use crate::errors::{ClearanceError, ClearanceResult};
use crate::repositories::{StudentRepository, VerificationRepository};
use crate::services::broadcast::{BroadcastTransport, EventBroadcaster};

/// The operator's committed decision for one presentation attempt
#[derive(Debug, Clone)]
pub enum DecisionInput {
    /// Admit into the given hall
    Admit { hall: String },
    /// Deny with a reason code and optional note
    Deny {
        reason: ReasonCode,
        note: Option<String>,
    },
}

/// Service committing decisions and writing the immutable audit trail
pub struct AuditRecorder<S, V, T>
where
    S: StudentRepository,
    V: VerificationRepository,
    T: BroadcastTransport,
{
    students: Arc<S>,
    records: Arc<V>,
    broadcaster: EventBroadcaster<T>,
}

impl<S, V, T> AuditRecorder<S, V, T>
where
    S: StudentRepository,
    V: VerificationRepository,
    T: BroadcastTransport,
{
    /// Create a new recorder
    pub fn new(students: Arc<S>, records: Arc<V>, broadcaster: EventBroadcaster<T>) -> Self {
        Self {
            students,
            records,
            broadcaster,
        }
    }

    /// Commit a decision and append it to the audit trail
    ///
    /// An admit attempt that loses the consumption race is committed as a
    /// deny with `already_used` and the winner's timestamp: an ordinary
    /// business outcome, not an error.
    ///
    /// # Returns
    /// * `Ok(VerificationRecord)` - The appended record
    /// * `Err(ClearanceError::Forbidden)` - Session role may not commit
    /// * `Err(ClearanceError::Validation)` - Admit without student or hall
    pub async fn record_decision(
        &self,
        ctx: &ExaminerContext,
        student_id: Option<Uuid>,
        input: DecisionInput,
    ) -> ClearanceResult<VerificationRecord> {
        if !ctx.can_commit() {
            return Err(ClearanceError::Forbidden {
                role: ctx.role.to_string(),
            });
        }

        let record = match input {
            DecisionInput::Admit { hall } => {
                let hall = hall.trim().to_string();
                if hall.is_empty() {
                    return Err(ClearanceError::Validation {
                        message: "admission requires a hall assignment".to_string(),
                    });
                }
                let student_id = student_id.ok_or_else(|| ClearanceError::Validation {
                    message: "admission requires an identified student".to_string(),
                })?;
                self.commit_admission(ctx, student_id, hall).await?
            }
            DecisionInput::Deny { reason, note } => {
                tracing::info!(
                    examiner_id = %ctx.id,
                    reason = %reason,
                    event = "deny_committed",
                    "Denial committed"
                );
                VerificationRecord::deny(ctx.id, student_id, reason, note)
            }
        };

        // the insert is the commit; notification comes strictly after
        let record = self.records.insert(record).await?;
        self.broadcaster.publish(&record).await;
        Ok(record)
    }

    /// Recent records for the dashboard read side
    pub async fn recent(
        &self,
        limit: u32,
        examiner_id: Option<Uuid>,
    ) -> ClearanceResult<Vec<VerificationRecord>> {
        self.records.recent(limit, examiner_id).await
    }

    /// Consume the token and build the admit (or race-lost deny) record
    async fn commit_admission(
        &self,
        ctx: &ExaminerContext,
        student_id: Uuid,
        hall: String,
    ) -> ClearanceResult<VerificationRecord> {
        let student = self
            .students
            .find_by_id(student_id)
            .await?
            .ok_or(ClearanceError::NotFound {
                resource: "Student".to_string(),
            })?;

        let Some(token) = student.clearance_token else {
            // the pass no longer corresponds to any issued token
            return Ok(VerificationRecord::deny(
                ctx.id,
                Some(student_id),
                ReasonCode::TokenMismatch,
                None,
            ));
        };

        if self.students.consume_token(student_id, &token).await? {
            tracing::info!(
                examiner_id = %ctx.id,
                student_id = %student_id,
                hall = %hall,
                event = "admit_committed",
                "Admission committed, token consumed"
            );
            Ok(VerificationRecord::admit(ctx.id, student_id, hall))
        } else {
            // lost the race against another terminal
            let used_at = self
                .students
                .find_by_id(student_id)
                .await?
                .and_then(|s| s.token_used_at);
            tracing::info!(
                examiner_id = %ctx.id,
                student_id = %student_id,
                event = "consumption_race_lost",
                "Conditional consume failed, committing already_used denial"
            );
            Ok(VerificationRecord::deny(
                ctx.id,
                Some(student_id),
                ReasonCode::AlreadyUsed { used_at },
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::pass::mint_token;
    use crate::domain::entities::student::Student;
    use crate::domain::value_objects::examiner::Role;
    use crate::errors::ClearanceError;
    use crate::repositories::{MockStudentRepository, MockVerificationRepository};
    use crate::services::broadcast::SessionGroup;
    use async_trait::async_trait;
    use serde_json::Value as JsonValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTransport {
        emits: AtomicUsize,
        fail: bool,
    }

    impl CountingTransport {
        fn new(fail: bool) -> Self {
            Self {
                emits: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl BroadcastTransport for CountingTransport {
        async fn join(&self, _: &str, _: SessionGroup) -> Result<(), ClearanceError> {
            Ok(())
        }

        async fn emit(
            &self,
            _: SessionGroup,
            _: &str,
            _: JsonValue,
        ) -> Result<(), ClearanceError> {
            if self.fail {
                return Err(ClearanceError::upstream("socket gone"));
            }
            self.emits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Fixture {
        recorder: AuditRecorder<MockStudentRepository, MockVerificationRepository, CountingTransport>,
        students: Arc<MockStudentRepository>,
        records: Arc<MockVerificationRepository>,
        transport: Arc<CountingTransport>,
    }

    fn fixture_with_transport(fail_broadcast: bool) -> Fixture {
        let students = Arc::new(MockStudentRepository::new());
        let records = Arc::new(MockVerificationRepository::new());
        let transport = Arc::new(CountingTransport::new(fail_broadcast));
        let recorder = AuditRecorder::new(
            students.clone(),
            records.clone(),
            EventBroadcaster::new(transport.clone()),
        );
        Fixture {
            recorder,
            students,
            records,
            transport,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_transport(false)
    }

    fn examiner() -> ExaminerContext {
        ExaminerContext::new(Uuid::new_v4(), "Mr. Bello", Role::Examiner)
    }

    async fn seeded_student(fx: &Fixture, token: &str) -> Uuid {
        let mut student =
            Student::new("ENG/2019/043", "Adaeze Obi", "Civil Engineering", "Engineering");
        student.complete_registration();
        student.mark_payment_verified();
        student.assign_token(token);
        let id = student.id;
        fx.students.insert(student).await;
        id
    }

    #[tokio::test]
    async fn test_admit_consumes_token_and_appends_record() {
        let fx = fixture();
        let token = mint_token();
        let student_id = seeded_student(&fx, &token).await;

        let record = fx
            .recorder
            .record_decision(
                &examiner(),
                Some(student_id),
                DecisionInput::Admit {
                    hall: "Main Hall".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(record.is_admit());
        assert_eq!(record.hall.as_deref(), Some("Main Hall"));

        let student = fx.students.find_by_id(student_id).await.unwrap().unwrap();
        assert!(student.token_used);
        assert_eq!(fx.records.all().await.len(), 1);
        assert_eq!(fx.transport.emits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_admit_attempt_is_denied_with_original_timestamp() {
        let fx = fixture();
        let token = mint_token();
        let student_id = seeded_student(&fx, &token).await;

        let admit_input = || DecisionInput::Admit {
            hall: "Main Hall".to_string(),
        };
        fx.recorder
            .record_decision(&examiner(), Some(student_id), admit_input())
            .await
            .unwrap();
        let used_at = fx
            .students
            .find_by_id(student_id)
            .await
            .unwrap()
            .unwrap()
            .token_used_at;

        let second = fx
            .recorder
            .record_decision(&examiner(), Some(student_id), admit_input())
            .await
            .unwrap();

        assert!(!second.is_admit());
        assert_eq!(second.reason, Some(ReasonCode::AlreadyUsed { used_at }));
        assert_eq!(fx.records.all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_admits_yield_exactly_one_admission() {
        let fx = fixture();
        let token = mint_token();
        let student_id = seeded_student(&fx, &token).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let recorder = AuditRecorder::new(
                fx.students.clone(),
                fx.records.clone(),
                EventBroadcaster::new(fx.transport.clone()),
            );
            handles.push(tokio::spawn(async move {
                recorder
                    .record_decision(
                        &examiner(),
                        Some(student_id),
                        DecisionInput::Admit {
                            hall: "Main Hall".to_string(),
                        },
                    )
                    .await
                    .unwrap()
            }));
        }

        let mut admits = 0;
        let mut already_used = 0;
        for handle in handles {
            let record = handle.await.unwrap();
            if record.is_admit() {
                admits += 1;
            } else if matches!(record.reason, Some(ReasonCode::AlreadyUsed { .. })) {
                already_used += 1;
            }
        }

        assert_eq!(admits, 1);
        assert_eq!(already_used, 7);
        // one record per attempt, whatever the outcome
        assert_eq!(fx.records.all().await.len(), 8);
    }

    #[tokio::test]
    async fn test_deny_is_recorded_without_touching_the_token() {
        let fx = fixture();
        let token = mint_token();
        let student_id = seeded_student(&fx, &token).await;

        let record = fx
            .recorder
            .record_decision(
                &examiner(),
                Some(student_id),
                DecisionInput::Deny {
                    reason: ReasonCode::PhotoMismatch,
                    note: Some("bearer does not match photo".to_string()),
                },
            )
            .await
            .unwrap();

        assert!(!record.is_admit());
        assert_eq!(record.reason, Some(ReasonCode::PhotoMismatch));

        let student = fx.students.find_by_id(student_id).await.unwrap().unwrap();
        assert!(!student.token_used);
    }

    #[tokio::test]
    async fn test_admit_requires_hall() {
        let fx = fixture();
        let token = mint_token();
        let student_id = seeded_student(&fx, &token).await;

        let result = fx
            .recorder
            .record_decision(
                &examiner(),
                Some(student_id),
                DecisionInput::Admit {
                    hall: "   ".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(ClearanceError::Validation { .. })));
        assert!(fx.records.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_viewer_role_cannot_commit() {
        let fx = fixture();
        let viewer = ExaminerContext::new(Uuid::new_v4(), "Dashboard", Role::Viewer);

        let result = fx
            .recorder
            .record_decision(
                &viewer,
                None,
                DecisionInput::Deny {
                    reason: ReasonCode::Other,
                    note: None,
                },
            )
            .await;

        assert!(matches!(result, Err(ClearanceError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_broadcast_failure_never_unwinds_the_commit() {
        let fx = fixture_with_transport(true);
        let token = mint_token();
        let student_id = seeded_student(&fx, &token).await;

        let record = fx
            .recorder
            .record_decision(
                &examiner(),
                Some(student_id),
                DecisionInput::Admit {
                    hall: "Main Hall".to_string(),
                },
            )
            .await
            .unwrap();

        // the decision is durable even though every emit failed
        assert!(record.is_admit());
        assert_eq!(fx.records.all().await.len(), 1);
        let student = fx.students.find_by_id(student_id).await.unwrap().unwrap();
        assert!(student.token_used);
    }

    #[tokio::test]
    async fn test_recent_exposes_the_read_side() {
        let fx = fixture();
        let token = mint_token();
        let student_id = seeded_student(&fx, &token).await;
        let ctx = examiner();

        fx.recorder
            .record_decision(
                &ctx,
                Some(student_id),
                DecisionInput::Admit {
                    hall: "Main Hall".to_string(),
                },
            )
            .await
            .unwrap();

        let recent = fx.recorder.recent(10, Some(ctx.id)).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert!(recent[0].is_admit());
    }
}
