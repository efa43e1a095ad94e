//! Pass codec: authenticated sealing of clearance payloads.

mod service;

pub use service::{AesGcmPassCodec, PassCodec};
