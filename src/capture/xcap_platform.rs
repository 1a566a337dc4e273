//! Native display capture using the `xcap` crate.
//!
//! This is the infrastructure layer; it talks to the OS. xcap reports
//! failures as free-form errors, so this file is also the one place where
//! backend messages are turned into typed `PlatformError`s.

use super::platform::{CapturePlatform, MediaStream, PlatformError};
use super::types::{CursorMode, DisplayConstraints, DisplaySurface, Frame};
use crate::config::MonitorSelector;
use xcap::Monitor;

/// Captures whole monitors through xcap.
#[derive(Debug, Clone, Default)]
pub struct XcapPlatform {
    selector: MonitorSelector,
}

impl XcapPlatform {
    pub fn new(selector: MonitorSelector) -> Self {
        Self { selector }
    }
}

impl CapturePlatform for XcapPlatform {
    type Stream = XcapStream;

    async fn request_display_stream(
        &self,
        constraints: &DisplayConstraints,
    ) -> Result<XcapStream, PlatformError> {
        if constraints.surface != DisplaySurface::Monitor {
            return Err(PlatformError::Unsupported(
                "only monitor surfaces can be captured".to_string(),
            ));
        }
        if constraints.audio {
            return Err(PlatformError::Unsupported(
                "audio capture is not available".to_string(),
            ));
        }
        if constraints.cursor == CursorMode::Never {
            log::debug!("[XCAP] Cursor visibility is decided by the OS compositor");
        }

        let selector = self.selector.clone();
        let selected = tokio::task::spawn_blocking(move || select_monitor(&selector))
            .await
            .map_err(|e| PlatformError::Backend(format!("monitor task failed: {}", e)))??;

        log::info!(
            "[XCAP] Selected monitor {} \"{}\" ({}x{})",
            selected.id,
            selected.name,
            selected.width,
            selected.height
        );

        Ok(XcapStream {
            monitor: selected,
            live: true,
        })
    }
}

/// A granted monitor. xcap has no long-lived stream, so the single "track"
/// is a flag that gates further frame reads.
#[derive(Debug)]
pub struct XcapStream {
    monitor: MonitorInfo,
    live: bool,
}

impl MediaStream for XcapStream {
    async fn first_frame(&mut self) -> Result<Frame, PlatformError> {
        if !self.live {
            return Err(PlatformError::FrameUnavailable(
                "stream stopped".to_string(),
            ));
        }

        let id = self.monitor.id;
        tokio::task::spawn_blocking(move || capture_monitor(id))
            .await
            .map_err(|e| PlatformError::Backend(format!("capture task failed: {}", e)))?
    }

    fn stop_all_tracks(&mut self) {
        self.live = false;
    }

    fn active_tracks(&self) -> usize {
        usize::from(self.live)
    }
}

/// The parts of an xcap monitor needed for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    pub id: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

fn select_monitor(selector: &MonitorSelector) -> Result<MonitorInfo, PlatformError> {
    let monitors = Monitor::all().map_err(|e| classify_backend_message(&e.to_string()))?;

    let infos: Vec<MonitorInfo> = monitors
        .iter()
        .filter_map(|m| {
            Some(MonitorInfo {
                id: m.id().ok()?,
                name: m.name().unwrap_or_default(),
                width: m.width().unwrap_or(0),
                height: m.height().unwrap_or(0),
                is_primary: m.is_primary().unwrap_or(false),
            })
        })
        .collect();

    pick_monitor(&infos, selector).cloned()
}

/// Chooses a monitor. With `Primary`, falls back to the first monitor when
/// none reports itself as primary.
pub fn pick_monitor<'a>(
    monitors: &'a [MonitorInfo],
    selector: &MonitorSelector,
) -> Result<&'a MonitorInfo, PlatformError> {
    let found = match selector {
        MonitorSelector::Primary => monitors
            .iter()
            .find(|m| m.is_primary)
            .or_else(|| monitors.first()),
        MonitorSelector::Index(index) => monitors.get(*index),
        MonitorSelector::Name(name) => monitors.iter().find(|m| &m.name == name),
    };

    found.ok_or(PlatformError::NoDisplaySource)
}

fn capture_monitor(id: u32) -> Result<Frame, PlatformError> {
    let monitors = Monitor::all().map_err(|e| classify_backend_message(&e.to_string()))?;
    let monitor = monitors
        .into_iter()
        .find(|m| m.id().ok() == Some(id))
        .ok_or(PlatformError::NoDisplaySource)?;

    let image = monitor
        .capture_image()
        .map_err(|e| classify_backend_message(&e.to_string()))?;

    let (width, height) = (image.width(), image.height());
    Ok(Frame::new(width, height, image.into_raw()))
}

/// Maps a backend error message onto the typed taxonomy.
///
/// Portal cancellations and OS access refusals count as a denial; an absent
/// output counts as no source; everything else is a backend failure.
pub fn classify_backend_message(message: &str) -> PlatformError {
    let lower = message.to_lowercase();

    const DENIED: [&str; 5] = [
        "permission",
        "denied",
        "not allowed",
        "notallowed",
        "cancelled",
    ];
    const MISSING: [&str; 5] = [
        "no monitor",
        "monitor not found",
        "no display",
        "display not found",
        "no output",
    ];

    if DENIED.iter().any(|needle| lower.contains(needle)) {
        PlatformError::PermissionDenied(message.to_string())
    } else if MISSING.iter().any(|needle| lower.contains(needle)) {
        PlatformError::NoDisplaySource
    } else {
        PlatformError::Backend(message.to_string())
    }
}
