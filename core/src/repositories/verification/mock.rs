//! In-memory implementation of VerificationRepository for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::ClearanceError;

use super::trait_::VerificationRepository;

/// Mock verification repository backed by an append-only vector
#[derive(Clone)]
pub struct MockVerificationRepository {
    records: Arc<RwLock<Vec<VerificationRecord>>>,
}

impl MockVerificationRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All stored records in insertion order, for assertions
    pub async fn all(&self) -> Vec<VerificationRecord> {
        self.records.read().await.clone()
    }
}

impl Default for MockVerificationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationRepository for MockVerificationRepository {
    async fn insert(
        &self,
        record: VerificationRecord,
    ) -> Result<VerificationRecord, ClearanceError> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(record)
    }

    async fn recent(
        &self,
        limit: u32,
        examiner_id: Option<Uuid>,
    ) -> Result<Vec<VerificationRecord>, ClearanceError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| examiner_id.map_or(true, |id| r.examiner_id == id))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::reason::ReasonCode;

    #[tokio::test]
    async fn test_recent_returns_newest_first() {
        let repo = MockVerificationRepository::new();
        let examiner = Uuid::new_v4();

        let first = VerificationRecord::admit(examiner, Uuid::new_v4(), "Hall A");
        let second =
            VerificationRecord::deny(examiner, None, ReasonCode::IdentityNotFound, None);
        repo.insert(first.clone()).await.unwrap();
        repo.insert(second.clone()).await.unwrap();

        let recent = repo.recent(10, None).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, second.id);
        assert_eq!(recent[1].id, first.id);
    }

    #[tokio::test]
    async fn test_recent_filters_by_examiner() {
        let repo = MockVerificationRepository::new();
        let ours = Uuid::new_v4();
        let theirs = Uuid::new_v4();

        repo.insert(VerificationRecord::admit(ours, Uuid::new_v4(), "Hall A"))
            .await
            .unwrap();
        repo.insert(VerificationRecord::admit(theirs, Uuid::new_v4(), "Hall B"))
            .await
            .unwrap();

        let recent = repo.recent(10, Some(ours)).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].examiner_id, ours);
    }

    #[tokio::test]
    async fn test_limit_is_applied() {
        let repo = MockVerificationRepository::new();
        let examiner = Uuid::new_v4();
        for _ in 0..5 {
            repo.insert(VerificationRecord::admit(examiner, Uuid::new_v4(), "Hall A"))
                .await
                .unwrap();
        }

        let recent = repo.recent(3, None).await.unwrap();
        assert_eq!(recent.len(), 3);
    }
}
