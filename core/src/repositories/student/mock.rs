//! In-memory implementation of StudentRepository for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::student::Student;
use crate::errors::ClearanceError;

use super::trait_::StudentRepository;

/// Mock student repository backed by a map
///
/// `consume_token` performs its check-and-set under a single write guard,
/// preserving the atomicity contract of the trait.
#[derive(Clone)]
pub struct MockStudentRepository {
    students: Arc<RwLock<HashMap<Uuid, Student>>>,
}

impl MockStudentRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self {
            students: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed the repository with a student
    pub async fn insert(&self, student: Student) {
        let mut students = self.students.write().await;
        students.insert(student.id, student);
    }
}

impl Default for MockStudentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudentRepository for MockStudentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, ClearanceError> {
        let students = self.students.read().await;
        Ok(students.get(&id).cloned())
    }

    async fn find_by_matric(&self, matric: &str) -> Result<Option<Student>, ClearanceError> {
        let students = self.students.read().await;
        Ok(students
            .values()
            .find(|s| s.matric_number.eq_ignore_ascii_case(matric.trim()))
            .cloned())
    }

    async fn set_token(&self, student_id: Uuid, token: &str) -> Result<(), ClearanceError> {
        let mut students = self.students.write().await;
        let student = students
            .get_mut(&student_id)
            .ok_or(ClearanceError::NotFound {
                resource: "Student".to_string(),
            })?;
        student.assign_token(token);
        Ok(())
    }

    async fn consume_token(&self, student_id: Uuid, token: &str) -> Result<bool, ClearanceError> {
        let mut students = self.students.write().await;
        let Some(student) = students.get_mut(&student_id) else {
            return Ok(false);
        };
        let matches = student.clearance_token.as_deref() == Some(token);
        if matches && !student.token_used {
            student.consume_token(Utc::now());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn set_payment_verified(&self, student_id: Uuid) -> Result<(), ClearanceError> {
        let mut students = self.students.write().await;
        let student = students
            .get_mut(&student_id)
            .ok_or(ClearanceError::NotFound {
                resource: "Student".to_string(),
            })?;
        student.mark_payment_verified();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_student() -> Student {
        let mut student =
            Student::new("ENG/2019/043", "Adaeze Obi", "Civil Engineering", "Engineering");
        student.complete_registration();
        student.mark_payment_verified();
        student
    }

    #[tokio::test]
    async fn test_find_by_matric_is_case_insensitive() {
        let repo = MockStudentRepository::new();
        repo.insert(seeded_student()).await;

        let found = repo.find_by_matric("eng/2019/043").await.unwrap();
        assert!(found.is_some());

        let found = repo.find_by_matric(" ENG/2019/043 ").await.unwrap();
        assert!(found.is_some());

        let missing = repo.find_by_matric("XYZ/000").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_consume_token_transitions_once() {
        let repo = MockStudentRepository::new();
        let mut student = seeded_student();
        student.assign_token("aabbccdd");
        let id = student.id;
        repo.insert(student).await;

        assert!(repo.consume_token(id, "aabbccdd").await.unwrap());
        assert!(!repo.consume_token(id, "aabbccdd").await.unwrap());

        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(stored.token_used);
        assert!(stored.token_used_at.is_some());
    }

    #[tokio::test]
    async fn test_consume_token_rejects_stale_token() {
        let repo = MockStudentRepository::new();
        let mut student = seeded_student();
        student.assign_token("aabbccdd");
        let id = student.id;
        repo.insert(student).await;

        assert!(!repo.consume_token(id, "11223344").await.unwrap());
        let stored = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(!stored.token_used);
    }
}
