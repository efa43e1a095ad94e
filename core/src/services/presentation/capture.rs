//! Cooperative optical capture loop.
//!
//! One decode attempt per tick at display-refresh cadence; the first
//! successful decode halts the loop. The loop has no built-in timeout:
//! it runs until a decode, a cancellation, or a frame-source fault, and
//! the camera is released on every one of those exits, because release
//! happens inside the loop task after the select, not in the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::errors::{ClearanceError, ClearanceResult};

/// Display-refresh cadence used by default (roughly 60 Hz)
pub const DEFAULT_TICK: Duration = Duration::from_millis(16);

/// A single camera frame handed to the barcode decoder
#[derive(Debug, Clone)]
pub struct Frame {
    /// Grayscale pixel data, row-major
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

/// Camera abstraction feeding the capture loop
#[async_trait]
pub trait FrameSource: Send {
    /// Grab the next frame
    async fn next_frame(&mut self) -> ClearanceResult<Frame>;

    /// Release the underlying camera handle
    ///
    /// Called exactly once by the capture loop, on every exit path.
    async fn release(&mut self);
}

/// 2-D barcode decoder applied to individual frames
pub trait FrameDecoder: Send + Sync {
    /// Attempt to decode a pass string from one frame
    fn decode(&self, frame: &Frame) -> Option<String>;
}

/// Factory for capture loops
pub struct OpticalCapture {
    tick: Duration,
}

impl OpticalCapture {
    /// Create a capture factory with the default display-refresh cadence
    pub fn new() -> Self {
        Self { tick: DEFAULT_TICK }
    }

    /// Override the sampling cadence
    pub fn with_tick(tick: Duration) -> Self {
        Self { tick }
    }

    /// Start a capture loop over the given source and decoder
    ///
    /// The returned handle is used to await the single-shot result or to
    /// cancel the loop (mode switch, decision rendered, teardown).
    pub fn start<S, D>(&self, mut source: S, decoder: Arc<D>) -> CaptureHandle
    where
        S: FrameSource + 'static,
        D: FrameDecoder + 'static,
    {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let tick = self.tick;

        let task: JoinHandle<ClearanceResult<Option<String>>> = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            tracing::debug!(event = "capture_started", "Optical capture loop running");

            let outcome = loop {
                tokio::select! {
                    changed = cancel_rx.changed() => {
                        // sender dropped counts as cancellation too
                        let _ = changed;
                        tracing::debug!(event = "capture_cancelled", "Optical capture loop cancelled");
                        break Ok(None);
                    }
                    _ = ticker.tick() => {
                        match source.next_frame().await {
                            Ok(frame) => {
                                if let Some(text) = decoder.decode(&frame) {
                                    tracing::info!(event = "capture_decoded", "Pass decoded from frame");
                                    break Ok(Some(text));
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, event = "capture_failed", "Frame source fault");
                                break Err(e);
                            }
                        }
                    }
                }
            };

            // single funnel for every exit path
            source.release().await;
            outcome
        });

        CaptureHandle { cancel_tx, task }
    }
}

impl Default for OpticalCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a running capture loop
pub struct CaptureHandle {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<ClearanceResult<Option<String>>>,
}

impl CaptureHandle {
    /// Request cooperative cancellation
    ///
    /// Idempotent; the loop releases the camera before it exits.
    pub fn stop(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Wait for the loop to finish
    ///
    /// # Returns
    /// * `Ok(Some(sealed))` - A pass string was decoded (single shot)
    /// * `Ok(None)` - The loop was cancelled before a decode
    /// * `Err(ClearanceError)` - The frame source faulted
    pub async fn wait(self) -> ClearanceResult<Option<String>> {
        self.task.await.map_err(|e| ClearanceError::Internal {
            message: format!("capture task panicked: {}", e),
        })?
    }
}
