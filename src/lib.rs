//! Step Capture: screen capture core for test-case authoring.
//!
//! This crate wires together:
//! - Screen capture domain (capture/)
//! - Test case drafts that carry step screenshots (testcase/)
//! - Environment configuration (config.rs)

pub mod capture;
pub mod config;
pub mod testcase;

pub use capture::{capture, capture_with, CaptureResult, ErrorKind, ScreenCapture};
pub use config::{CaptureConfig, MonitorSelector};
