//! Verification record repository trait.
//!
//! The audit trail is append-only: there is deliberately no update or
//! delete operation on this interface.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::ClearanceError;

/// Repository contract for the append-only gate audit trail
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Insert a record
    ///
    /// Inserts are race-free by construction; no coordination is required
    /// between concurrent writers.
    async fn insert(&self, record: VerificationRecord)
        -> Result<VerificationRecord, ClearanceError>;

    /// Fetch the most recent records, newest first
    ///
    /// # Arguments
    /// * `limit` - Maximum number of records to return
    /// * `examiner_id` - Restrict to one examiner's decisions when set
    async fn recent(
        &self,
        limit: u32,
        examiner_id: Option<Uuid>,
    ) -> Result<Vec<VerificationRecord>, ClearanceError>;
}
