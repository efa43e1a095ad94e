//! Domain entities representing core business objects.

pub mod pass;
pub mod student;
pub mod verification_record;

// Re-export commonly used types
pub use pass::{mint_token, ClearancePayload, PASS_ISSUER, TOKEN_BYTES};
pub use student::Student;
pub use verification_record::{Decision, VerificationRecord};
