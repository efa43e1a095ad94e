//! Candidate normalization for the two capture paths.

use std::sync::Arc;

use eg_shared::utils::matric;

use crate::domain::entities::student::Student;
use crate::errors::ClearanceResult;
use crate::repositories::StudentRepository;

/// A presentation attempt, normalized from either capture path
///
/// Whatever the path, the verification engine receives one of these and
/// always answers with a typed verdict.
#[derive(Debug, Clone)]
pub enum Candidate {
    /// An opaque pass string from the optical path
    Sealed(String),
    /// A student resolved through manual lookup
    Identified(Student),
    /// A manual query that matched no student
    Unmatched {
        /// The identifier as entered, kept for the operator display
        query: String,
    },
}

/// Reader turning scans and typed identifiers into verification candidates
pub struct PresentationReader<S>
where
    S: StudentRepository,
{
    students: Arc<S>,
}

impl<S> PresentationReader<S>
where
    S: StudentRepository,
{
    /// Create a new reader
    pub fn new(students: Arc<S>) -> Self {
        Self { students }
    }

    /// Wrap a decoded pass string from the optical path
    pub fn from_scan(&self, sealed: impl Into<String>) -> Candidate {
        Candidate::Sealed(sealed.into())
    }

    /// Resolve a manually entered identifier
    ///
    /// The lookup is a case-insensitive exact match on the matriculation
    /// number. A miss is a candidate too: the engine turns it into the
    /// `identity_not_found` denial so that every attempt is recorded.
    pub async fn lookup_manual(&self, input: &str) -> ClearanceResult<Candidate> {
        let query = matric::normalize_matric(input);
        match self.students.find_by_matric(&query).await? {
            Some(student) => {
                tracing::debug!(
                    matric = %matric::mask_matric(&query),
                    event = "manual_lookup_hit",
                    "Manual lookup resolved a student"
                );
                Ok(Candidate::Identified(student))
            }
            None => {
                tracing::info!(
                    matric = %matric::mask_matric(&query),
                    event = "manual_lookup_miss",
                    "Manual lookup matched no student"
                );
                Ok(Candidate::Unmatched { query })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockStudentRepository;

    async fn reader_with_student() -> (PresentationReader<MockStudentRepository>, Student) {
        let repo = Arc::new(MockStudentRepository::new());
        let student =
            Student::new("ENG/2019/043", "Adaeze Obi", "Civil Engineering", "Engineering");
        repo.insert(student.clone()).await;
        (PresentationReader::new(repo), student)
    }

    #[tokio::test]
    async fn test_manual_lookup_is_case_insensitive() {
        let (reader, student) = reader_with_student().await;

        let candidate = reader.lookup_manual("  eng/2019/043 ").await.unwrap();
        match candidate {
            Candidate::Identified(found) => assert_eq!(found.id, student.id),
            other => panic!("expected Identified, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_manual_lookup_miss_yields_unmatched() {
        let (reader, _) = reader_with_student().await;

        let candidate = reader.lookup_manual("XYZ/000").await.unwrap();
        match candidate {
            Candidate::Unmatched { query } => assert_eq!(query, "XYZ/000"),
            other => panic!("expected Unmatched, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scan_wraps_sealed_string() {
        let (reader, _) = reader_with_student().await;

        match reader.from_scan("opaque") {
            Candidate::Sealed(s) => assert_eq!(s, "opaque"),
            other => panic!("expected Sealed, got {:?}", other),
        }
    }
}
