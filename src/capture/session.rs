//! Scoped ownership of one capture's stream, plus the phase it is in.
//!
//! `CaptureSession` owns the stream for exactly one call. Dropping the
//! session stops every track, so early returns, `?` and a cancelled future
//! all end with the stream released.

use super::platform::{MediaStream, PlatformError};
use super::types::Frame;

/// Where a single capture call currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    RequestingPermission,
    StreamAcquired,
    FrameReady,
    Encoded,
    Released,
}

impl CapturePhase {
    /// Legal forward transitions. `Released` is reachable from every phase
    /// that may hold a stream, and is terminal.
    pub fn can_advance_to(self, next: CapturePhase) -> bool {
        use CapturePhase::*;
        matches!(
            (self, next),
            (Idle, RequestingPermission)
                | (RequestingPermission, StreamAcquired)
                | (RequestingPermission, Released)
                | (StreamAcquired, FrameReady)
                | (StreamAcquired, Released)
                | (FrameReady, Released)
                | (FrameReady, Encoded)
                | (Encoded, Released)
        )
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Illegal capture transition {from:?} -> {to:?}")]
pub struct PhaseError {
    pub from: CapturePhase,
    pub to: CapturePhase,
}

/// Tracks the phase of one capture call.
#[derive(Debug)]
pub struct PhaseTracker {
    phase: CapturePhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: CapturePhase::Idle,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn advance(&mut self, next: CapturePhase) -> Result<(), PhaseError> {
        if !self.phase.can_advance_to(next) {
            return Err(PhaseError {
                from: self.phase,
                to: next,
            });
        }
        log::debug!("[CAPTURE] {:?} -> {:?}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive owner of an acquired stream.
pub struct CaptureSession<S: MediaStream> {
    stream: Option<S>,
}

impl<S: MediaStream> CaptureSession<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    /// Waits for the stream's first frame.
    pub async fn first_frame(&mut self) -> Result<Frame, PlatformError> {
        match self.stream.as_mut() {
            Some(stream) => stream.first_frame().await,
            None => Err(PlatformError::FrameUnavailable(
                "stream already released".to_string(),
            )),
        }
    }

    /// Stops all tracks now. Calling it twice is harmless.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all_tracks();
            log::debug!(
                "[CAPTURE] Stream released ({} tracks still active)",
                stream.active_tracks()
            );
        }
    }

    pub fn is_released(&self) -> bool {
        self.stream.is_none()
    }
}

impl<S: MediaStream> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        self.release();
    }
}
