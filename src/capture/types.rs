//! Value types that cross the capture boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single capture call.
///
/// Serialized for UI consumers as
/// `{"status":"success","imageData":"data:image/png;base64,..."}` or
/// `{"status":"failure","reason":"permissionDenied"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CaptureResult {
    #[serde(rename_all = "camelCase")]
    Success { image_data: String },
    Failure { reason: ErrorKind },
}

impl CaptureResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CaptureResult::Success { .. })
    }

    /// The data-URI payload, if the capture succeeded.
    pub fn image_data(&self) -> Option<&str> {
        match self {
            CaptureResult::Success { image_data } => Some(image_data),
            CaptureResult::Failure { .. } => None,
        }
    }

    /// The failure cause, if the capture failed.
    pub fn failure(&self) -> Option<ErrorKind> {
        match self {
            CaptureResult::Success { .. } => None,
            CaptureResult::Failure { reason } => Some(*reason),
        }
    }

    /// Converts into a plain `Result` for callers that want `?`.
    pub fn into_result(self) -> Result<String, ErrorKind> {
        match self {
            CaptureResult::Success { image_data } => Ok(image_data),
            CaptureResult::Failure { reason } => Err(reason),
        }
    }
}

/// Classified failure cause. Exhaustive and mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    PermissionDenied,
    DeviceNotFound,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::DeviceNotFound => "device not found",
            ErrorKind::Unknown => "unknown capture failure",
        };
        f.write_str(s)
    }
}

/// Which kind of display surface a stream may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySurface {
    Monitor,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Always,
    Never,
}

/// What the capture operation asks the platform for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConstraints {
    pub surface: DisplaySurface,
    pub cursor: CursorMode,
    pub audio: bool,
}

impl Default for DisplayConstraints {
    /// Whole monitor, cursor visible, no audio.
    fn default() -> Self {
        Self {
            surface: DisplaySurface::Monitor,
            cursor: CursorMode::Always,
            audio: false,
        }
    }
}

/// One decoded video frame as tightly packed RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }
}

// Pixel data is far too large for debug output.
impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_with_image_data_key() {
        let result = CaptureResult::Success {
            image_data: "data:image/png;base64,AAAA".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"status":"success","imageData":"data:image/png;base64,AAAA"}"#
        );
    }

    #[test]
    fn failure_serializes_reason_in_camel_case() {
        let result = CaptureResult::Failure {
            reason: ErrorKind::PermissionDenied,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"status":"failure","reason":"permissionDenied"}"#);
    }

    #[test]
    fn into_result_splits_variants() {
        let ok = CaptureResult::Success {
            image_data: "x".into(),
        };
        assert_eq!(ok.into_result(), Ok("x".to_string()));

        let err = CaptureResult::Failure {
            reason: ErrorKind::DeviceNotFound,
        };
        assert_eq!(err.failure(), Some(ErrorKind::DeviceNotFound));
        assert!(!err.is_success());
        assert_eq!(err.into_result(), Err(ErrorKind::DeviceNotFound));
    }

    #[test]
    fn default_constraints_request_monitor_without_audio() {
        let c = DisplayConstraints::default();
        assert_eq!(c.surface, DisplaySurface::Monitor);
        assert_eq!(c.cursor, CursorMode::Always);
        assert!(!c.audio);
    }
}
