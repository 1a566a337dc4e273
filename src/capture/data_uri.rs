//! Self-describing `data:` URIs for captured images.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::ImageFormat;
use regex::Regex;
use std::sync::LazyLock;

pub const PNG_MIME: &str = "image/png";

static DATA_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(?P<mime>[a-z]+/[a-z0-9.+-]+);base64,(?P<payload>[A-Za-z0-9+/]*={0,2})$")
        .unwrap()
});

/// Wraps PNG bytes as `data:image/png;base64,...`.
pub fn encode_png(png_bytes: &[u8]) -> String {
    format!("data:{};base64,{}", PNG_MIME, STANDARD.encode(png_bytes))
}

/// A parsed base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let caps = DATA_URI.captures(uri).ok_or(DataUriError::Malformed)?;
        let bytes = STANDARD
            .decode(&caps["payload"])
            .map_err(|e| DataUriError::Base64(e.to_string()))?;

        Ok(Self {
            mime: caps["mime"].to_string(),
            bytes,
        })
    }

    /// Pixel dimensions of the embedded image. Only PNG is accepted.
    pub fn image_dimensions(&self) -> Result<(u32, u32), DataUriError> {
        if self.mime != PNG_MIME {
            return Err(DataUriError::UnsupportedMime(self.mime.clone()));
        }
        let image = image::load_from_memory_with_format(&self.bytes, ImageFormat::Png)
            .map_err(|e| DataUriError::Image(e.to_string()))?;
        Ok((image.width(), image.height()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DataUriError {
    #[error("Not a base64 data URI")]
    Malformed,

    #[error("Invalid base64 payload: {0}")]
    Base64(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedMime(String),

    #[error("Payload is not a decodable image: {0}")]
    Image(String),
}
