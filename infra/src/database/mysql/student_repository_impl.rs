//! MySQL implementation of the StudentRepository trait.
//!
//! `consume_token` is implemented as a single conditional UPDATE; the
//! database row lock makes it atomic, so of any number of racing commits
//! exactly one observes `rows_affected == 1`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use eg_core::domain::entities::student::Student;
use eg_core::errors::ClearanceError;
use eg_core::repositories::StudentRepository;

/// MySQL implementation of StudentRepository
pub struct MySqlStudentRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlStudentRepository {
    /// Create a new MySQL student repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    const COLUMNS: &'static str = "id, matric_number, full_name, department, faculty, photo_url, \
         registration_complete, payment_verified, clearance_token, token_used, token_used_at, \
         created_at, updated_at";

    /// Convert a database row to a Student entity
    fn row_to_student(row: &sqlx::mysql::MySqlRow) -> Result<Student, ClearanceError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| ClearanceError::storage(format!("failed to get id: {}", e)))?;

        Ok(Student {
            id: Uuid::parse_str(&id)
                .map_err(|e| ClearanceError::storage(format!("invalid student UUID: {}", e)))?,
            matric_number: row
                .try_get("matric_number")
                .map_err(|e| ClearanceError::storage(format!("failed to get matric_number: {}", e)))?,
            full_name: row
                .try_get("full_name")
                .map_err(|e| ClearanceError::storage(format!("failed to get full_name: {}", e)))?,
            department: row
                .try_get("department")
                .map_err(|e| ClearanceError::storage(format!("failed to get department: {}", e)))?,
            faculty: row
                .try_get("faculty")
                .map_err(|e| ClearanceError::storage(format!("failed to get faculty: {}", e)))?,
            photo_url: row
                .try_get("photo_url")
                .map_err(|e| ClearanceError::storage(format!("failed to get photo_url: {}", e)))?,
            registration_complete: row.try_get("registration_complete").map_err(|e| {
                ClearanceError::storage(format!("failed to get registration_complete: {}", e))
            })?,
            payment_verified: row
                .try_get("payment_verified")
                .map_err(|e| ClearanceError::storage(format!("failed to get payment_verified: {}", e)))?,
            clearance_token: row
                .try_get("clearance_token")
                .map_err(|e| ClearanceError::storage(format!("failed to get clearance_token: {}", e)))?,
            token_used: row
                .try_get("token_used")
                .map_err(|e| ClearanceError::storage(format!("failed to get token_used: {}", e)))?,
            token_used_at: row
                .try_get::<Option<DateTime<Utc>>, _>("token_used_at")
                .map_err(|e| ClearanceError::storage(format!("failed to get token_used_at: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| ClearanceError::storage(format!("failed to get created_at: {}", e)))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| ClearanceError::storage(format!("failed to get updated_at: {}", e)))?,
        })
    }
}

#[async_trait]
impl StudentRepository for MySqlStudentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, ClearanceError> {
        let query = format!(
            "SELECT {} FROM students WHERE id = ? LIMIT 1",
            Self::COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ClearanceError::storage(format!("failed to find student: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_student(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_matric(&self, matric: &str) -> Result<Option<Student>, ClearanceError> {
        // exact match apart from letter case
        let query = format!(
            "SELECT {} FROM students WHERE LOWER(matric_number) = LOWER(?) LIMIT 1",
            Self::COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(matric.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                ClearanceError::storage(format!("failed to find student by matric: {}", e))
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_student(&row)?)),
            None => Ok(None),
        }
    }

    async fn set_token(&self, student_id: Uuid, token: &str) -> Result<(), ClearanceError> {
        let query = r#"
            UPDATE students
            SET clearance_token = ?, token_used = FALSE, token_used_at = NULL, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(token)
            .bind(Utc::now())
            .bind(student_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| ClearanceError::storage(format!("failed to set token: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(ClearanceError::NotFound {
                resource: "Student".to_string(),
            });
        }
        Ok(())
    }

    async fn consume_token(&self, student_id: Uuid, token: &str) -> Result<bool, ClearanceError> {
        // the compare-and-set: succeeds for exactly one racing commit
        let query = r#"
            UPDATE students
            SET token_used = TRUE, token_used_at = ?, updated_at = ?
            WHERE id = ? AND clearance_token = ? AND token_used = FALSE
        "#;

        let now = Utc::now();
        let result = sqlx::query(query)
            .bind(now)
            .bind(now)
            .bind(student_id.to_string())
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| ClearanceError::storage(format!("failed to consume token: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_payment_verified(&self, student_id: Uuid) -> Result<(), ClearanceError> {
        let query = r#"
            UPDATE students
            SET payment_verified = TRUE, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(student_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                ClearanceError::storage(format!("failed to set payment_verified: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(ClearanceError::NotFound {
                resource: "Student".to_string(),
            });
        }
        Ok(())
    }
}
