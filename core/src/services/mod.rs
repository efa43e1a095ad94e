//! Business services implementing the clearance-token lifecycle.

pub mod audit;
pub mod broadcast;
pub mod codec;
pub mod issuance;
pub mod payment;
pub mod presentation;
pub mod verification;

// Re-export commonly used types
pub use audit::{AuditRecorder, DecisionInput};
pub use broadcast::{BroadcastTransport, EventBroadcaster, SessionGroup, DECISION_EVENT};
pub use codec::{AesGcmPassCodec, PassCodec};
pub use issuance::{ClearanceIssuer, IssuedPass};
pub use payment::{PaymentGateway, PaymentOutcome, PaymentService, PaymentStatus};
pub use presentation::{
    Candidate, CaptureHandle, Frame, FrameDecoder, FrameSource, OpticalCapture, PresentationReader,
};
pub use verification::VerificationEngine;
