//! Test case authoring: the draft a user edits before submitting.
//!
//! Screenshots attached to steps come straight from `capture::capture()`.

mod draft;
mod submit;
mod validate;

pub use draft::{DraftError, Priority, Step, TagError, TestCaseDraft, MAX_TAGS};
pub use submit::{submit, SUBMIT_DELAY};
pub use validate::{StepErrors, ValidationErrors, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS};

use crate::capture::ErrorKind;

/// User-facing text for a failed capture.
pub fn capture_failure_message(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::PermissionDenied => {
            "Permission denied. Please allow screen capture to take screenshots."
        }
        ErrorKind::DeviceNotFound => "Screen capture device not found.",
        ErrorKind::Unknown => "Failed to capture screenshot. Please try again.",
    }
}
