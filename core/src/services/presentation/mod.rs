//! Presentation capture: optical scanning and manual lookup.

mod capture;
mod service;

pub use capture::{CaptureHandle, Frame, FrameDecoder, FrameSource, OpticalCapture};
pub use service::{Candidate, PresentationReader};
