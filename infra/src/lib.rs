//! # Infrastructure Layer
//!
//! Concrete implementations behind the core's repository and transport
//! traits:
//! - **Database**: MySQL repositories using SQLx, including the conditional
//!   token-consumption write that serializes concurrent admissions
//! - **Payment**: HTTP client for the payment gateway's verification call
//! - **Broadcast**: in-process session transport for dashboard fan-out

pub mod broadcast;
pub mod config;
pub mod database;
pub mod payment;

pub use broadcast::InMemoryBroadcastTransport;
pub use config::load_config;
pub use database::connect;
pub use database::mysql::{MySqlStudentRepository, MySqlVerificationRepository};
pub use payment::HttpPaymentGateway;
