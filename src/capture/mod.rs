//! Screen capture domain, public API.
//!
//! One call acquires a display stream, waits for its first frame, copies the
//! frame into a raster surface, releases the stream and returns the frame as
//! a PNG data URI. Every failure comes back as a typed `CaptureResult`.

pub mod data_uri;
pub mod platform;
pub mod raster;
pub mod session;
mod types;
pub mod xcap_platform;

pub use data_uri::DataUri;
pub use platform::{CapturePlatform, MediaStream, PlatformError};
pub use raster::RasterSurface;
pub use session::{CapturePhase, CaptureSession, PhaseTracker};
pub use types::{CaptureResult, CursorMode, DisplayConstraints, DisplaySurface, ErrorKind, Frame};
pub use xcap_platform::XcapPlatform;

use crate::config::CaptureConfig;
use raster::RasterError;
use std::time::Instant;

/// Everything that can go wrong inside one capture call.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Rasterizing frame failed: {0}")]
    Raster(#[from] RasterError),
}

impl CaptureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptureError::Platform(e) => e.kind(),
            CaptureError::Raster(_) => ErrorKind::Unknown,
        }
    }
}

/// Single-frame screen capture over a platform backend.
///
/// Calls are independent: each opens and releases its own stream, and
/// nothing is shared between them.
pub struct ScreenCapture<P: CapturePlatform> {
    platform: P,
    constraints: DisplayConstraints,
}

impl<P: CapturePlatform> ScreenCapture<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            constraints: DisplayConstraints::default(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Captures one frame of a monitor.
    ///
    /// Suspends while the OS asks for permission and while the first frame
    /// is produced. There is no timeout; wrap the future if one is needed.
    /// Dropping the future releases any acquired stream.
    pub async fn capture(&self) -> CaptureResult {
        let start = Instant::now();
        let mut phases = PhaseTracker::new();

        let outcome = self.run(&mut phases).await;

        // Terminal state for every path.
        if let Err(e) = phases.advance(CapturePhase::Released) {
            log::warn!("[CAPTURE] {}", e);
        }

        match outcome {
            Ok(image_data) => {
                log::info!(
                    "[CAPTURE] Captured in {}ms ({} chars)",
                    start.elapsed().as_millis(),
                    image_data.len()
                );
                CaptureResult::Success { image_data }
            }
            Err(e) => {
                let reason = e.kind();
                log::warn!(
                    "[CAPTURE] Failed after {}ms: {} ({:?})",
                    start.elapsed().as_millis(),
                    e,
                    reason
                );
                CaptureResult::Failure { reason }
            }
        }
    }

    async fn run(&self, phases: &mut PhaseTracker) -> Result<String, CaptureError> {
        advance(phases, CapturePhase::RequestingPermission)?;
        let stream = self
            .platform
            .request_display_stream(&self.constraints)
            .await?;

        let mut session = CaptureSession::new(stream);
        advance(phases, CapturePhase::StreamAcquired)?;

        let frame = session.first_frame().await?;
        log::debug!("[CAPTURE] First frame {}x{}", frame.width, frame.height);
        advance(phases, CapturePhase::FrameReady)?;

        let surface = RasterSurface::from_frame(frame);
        // Stop sharing as soon as the pixels are copied, whether or not that worked.
        session.release();
        let surface = surface?;

        let png_bytes = surface.encode_png()?;
        advance(phases, CapturePhase::Encoded)?;

        Ok(data_uri::encode_png(&png_bytes))
    }
}

fn advance(phases: &mut PhaseTracker, next: CapturePhase) -> Result<(), CaptureError> {
    phases
        .advance(next)
        .map_err(|e| CaptureError::Platform(PlatformError::Backend(e.to_string())))
}

/// Captures the configured monitor with the native backend.
///
/// Reads `CaptureConfig` from the environment; an unreadable config falls
/// back to the defaults.
pub async fn capture() -> CaptureResult {
    let config = CaptureConfig::from_env().unwrap_or_else(|e| {
        log::warn!("[CAPTURE] {}, using defaults", e);
        CaptureConfig::default()
    });
    capture_with(&config).await
}

/// Captures with an explicit config.
pub async fn capture_with(config: &CaptureConfig) -> CaptureResult {
    ScreenCapture::new(XcapPlatform::new(config.monitor.clone()))
        .capture()
        .await
}
