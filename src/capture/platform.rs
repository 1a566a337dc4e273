//! Platform abstraction: the seam between the capture flow and the OS.
//!
//! A platform hands out display streams; a stream yields frames and owns
//! tracks that must be stopped. Backends classify their own failures into
//! `PlatformError` so nothing upstream has to guess from message text.

use super::types::{DisplayConstraints, ErrorKind, Frame};
use std::future::Future;

/// Source of display streams (a monitor, a portal, a test double).
pub trait CapturePlatform {
    type Stream: MediaStream;

    /// Requests a display stream matching `constraints`.
    ///
    /// This is where the OS permission prompt appears. Implementations must
    /// not return a stream the user has not granted.
    fn request_display_stream(
        &self,
        constraints: &DisplayConstraints,
    ) -> impl Future<Output = Result<Self::Stream, PlatformError>> + Send;
}

/// A live stream with one or more tracks.
pub trait MediaStream {
    /// Waits until a decoded frame is available and returns it.
    fn first_frame(&mut self) -> impl Future<Output = Result<Frame, PlatformError>> + Send;

    /// Stops every track. Must be idempotent.
    fn stop_all_tracks(&mut self);

    /// Number of tracks that have not been stopped.
    fn active_tracks(&self) -> usize;
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Screen capture permission denied: {0}")]
    PermissionDenied(String),

    #[error("No capturable display source")]
    NoDisplaySource,

    #[error("Unsupported capture request: {0}")]
    Unsupported(String),

    #[error("Capture backend failed: {0}")]
    Backend(String),

    #[error("No frame available: {0}")]
    FrameUnavailable(String),
}

impl PlatformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlatformError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            PlatformError::NoDisplaySource => ErrorKind::DeviceNotFound,
            PlatformError::Unsupported(_)
            | PlatformError::Backend(_)
            | PlatformError::FrameUnavailable(_) => ErrorKind::Unknown,
        }
    }
}
