//! Student repository trait defining the interface for student persistence.
//!
//! The clearance subsystem owns the token columns; everything else on the
//! student row belongs to registration. Implementations must make
//! `consume_token` a single conditional write at the storage layer; it is
//! the only serialization point in the system.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::student::Student;
use crate::errors::ClearanceError;

/// Repository contract for Student persistence operations
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Find a student by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(Student))` - Student found
    /// * `Ok(None)` - No student with the given ID
    /// * `Err(ClearanceError)` - Storage fault
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, ClearanceError>;

    /// Find a student by matriculation number, case-insensitively
    ///
    /// The match is exact apart from letter case; partial matches are never
    /// returned.
    async fn find_by_matric(&self, matric: &str) -> Result<Option<Student>, ClearanceError>;

    /// Bind a clearance token to a student, clearing any consumption state
    ///
    /// # Returns
    /// * `Err(ClearanceError::NotFound)` - No student with the given ID
    async fn set_token(&self, student_id: Uuid, token: &str) -> Result<(), ClearanceError>;

    /// Conditionally consume the student's token
    ///
    /// Atomically transitions the consumed flag false → true, but only while
    /// the stored token equals `token` and is still unconsumed. This is a
    /// compare-and-set, not a read-then-write: when two commits race, exactly
    /// one observes `true`.
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the transition
    /// * `Ok(false)` - Token already consumed, rotated, or absent
    async fn consume_token(&self, student_id: Uuid, token: &str) -> Result<bool, ClearanceError>;

    /// Mark the student's examination fee as verified
    async fn set_payment_verified(&self, student_id: Uuid) -> Result<(), ClearanceError>;
}
