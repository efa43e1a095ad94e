//! MySQL repository implementations.

mod student_repository_impl;
mod verification_repository_impl;

pub use student_repository_impl::MySqlStudentRepository;
pub use verification_repository_impl::MySqlVerificationRepository;
