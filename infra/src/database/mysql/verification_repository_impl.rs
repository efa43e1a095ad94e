//! MySQL implementation of the VerificationRepository trait.
//!
//! The table is append-only: this module issues INSERT and SELECT
//! statements and nothing else.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use eg_core::domain::entities::verification_record::{Decision, VerificationRecord};
use eg_core::domain::value_objects::reason::ReasonCode;
use eg_core::errors::ClearanceError;
use eg_core::repositories::VerificationRepository;

/// MySQL implementation of VerificationRepository
pub struct MySqlVerificationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationRepository {
    /// Create a new MySQL verification repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a VerificationRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<VerificationRecord, ClearanceError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| ClearanceError::storage(format!("failed to get id: {}", e)))?;
        let examiner_id: String = row
            .try_get("examiner_id")
            .map_err(|e| ClearanceError::storage(format!("failed to get examiner_id: {}", e)))?;
        let student_id: Option<String> = row
            .try_get("student_id")
            .map_err(|e| ClearanceError::storage(format!("failed to get student_id: {}", e)))?;
        let decision: String = row
            .try_get("decision")
            .map_err(|e| ClearanceError::storage(format!("failed to get decision: {}", e)))?;
        let reason: Option<String> = row
            .try_get("reason")
            .map_err(|e| ClearanceError::storage(format!("failed to get reason: {}", e)))?;

        let reason = reason
            .map(|raw| {
                serde_json::from_str::<ReasonCode>(&raw)
                    .map_err(|e| ClearanceError::storage(format!("invalid stored reason: {}", e)))
            })
            .transpose()?;

        Ok(VerificationRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| ClearanceError::storage(format!("invalid record UUID: {}", e)))?,
            examiner_id: Uuid::parse_str(&examiner_id)
                .map_err(|e| ClearanceError::storage(format!("invalid examiner UUID: {}", e)))?,
            student_id: student_id
                .map(|s| {
                    Uuid::parse_str(&s).map_err(|e| {
                        ClearanceError::storage(format!("invalid student UUID: {}", e))
                    })
                })
                .transpose()?,
            decision: Decision::parse(&decision).ok_or_else(|| {
                ClearanceError::storage(format!("invalid stored decision: {}", decision))
            })?,
            reason,
            hall: row
                .try_get("hall")
                .map_err(|e| ClearanceError::storage(format!("failed to get hall: {}", e)))?,
            note: row
                .try_get("note")
                .map_err(|e| ClearanceError::storage(format!("failed to get note: {}", e)))?,
            recorded_at: row
                .try_get::<DateTime<Utc>, _>("recorded_at")
                .map_err(|e| ClearanceError::storage(format!("failed to get recorded_at: {}", e)))?,
        })
    }
}

#[async_trait]
impl VerificationRepository for MySqlVerificationRepository {
    async fn insert(
        &self,
        record: VerificationRecord,
    ) -> Result<VerificationRecord, ClearanceError> {
        let reason = record
            .reason
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ClearanceError::storage(format!("failed to encode reason: {}", e)))?;

        let query = r#"
            INSERT INTO verification_records (
                id, examiner_id, student_id, decision, reason, hall, note, recorded_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.examiner_id.to_string())
            .bind(record.student_id.map(|id| id.to_string()))
            .bind(record.decision.as_str())
            .bind(reason.as_deref())
            .bind(record.hall.as_deref())
            .bind(record.note.as_deref())
            .bind(record.recorded_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                ClearanceError::storage(format!("failed to insert verification record: {}", e))
            })?;

        Ok(record)
    }

    async fn recent(
        &self,
        limit: u32,
        examiner_id: Option<Uuid>,
    ) -> Result<Vec<VerificationRecord>, ClearanceError> {
        let rows = match examiner_id {
            Some(examiner) => {
                let query = r#"
                    SELECT id, examiner_id, student_id, decision, reason, hall, note, recorded_at
                    FROM verification_records
                    WHERE examiner_id = ?
                    ORDER BY recorded_at DESC
                    LIMIT ?
                "#;
                sqlx::query(query)
                    .bind(examiner.to_string())
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let query = r#"
                    SELECT id, examiner_id, student_id, decision, reason, hall, note, recorded_at
                    FROM verification_records
                    ORDER BY recorded_at DESC
                    LIMIT ?
                "#;
                sqlx::query(query).bind(limit).fetch_all(&self.pool).await
            }
        }
        .map_err(|e| {
            ClearanceError::storage(format!("failed to fetch verification records: {}", e))
        })?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(Self::row_to_record(&row)?);
        }
        Ok(records)
    }
}
