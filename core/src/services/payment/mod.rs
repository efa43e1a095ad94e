//! Payment confirmation through the external gateway.

mod gateway;
mod service;

pub use gateway::{PaymentGateway, PaymentOutcome};
pub use service::{PaymentService, PaymentStatus, TEST_REFERENCE};
