//! Clearance issuance: minting and reusing single-use tokens.

mod service;

pub use service::{ClearanceIssuer, IssuedPass};
