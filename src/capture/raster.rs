//! Raster surface, the functional core of a capture.
//!
//! No infrastructure dependencies: a frame goes in, PNG bytes come out.

use super::types::Frame;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Offscreen pixel buffer holding exactly one frame at native resolution.
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// Copies `frame` into a surface of the same size.
    ///
    /// Pixels are taken as-is; there is no scaling and no color conversion.
    pub fn from_frame(frame: Frame) -> Result<Self, RasterError> {
        let Frame {
            width,
            height,
            rgba,
        } = frame;

        if width == 0 || height == 0 {
            return Err(RasterError::ZeroDimension);
        }

        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }

        let image = RgbaImage::from_raw(width, height, rgba).ok_or(RasterError::BufferSize {
            expected,
            actual: 0,
        })?;

        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encodes the surface losslessly as PNG.
    pub fn encode_png(self) -> Result<Vec<u8>, RasterError> {
        let mut png_bytes: Vec<u8> = Vec::new();
        DynamicImage::ImageRgba8(self.image)
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| RasterError::EncodingFailed(e.to_string()))?;

        Ok(png_bytes)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Frame has zero width or height")]
    ZeroDimension,

    #[error("Frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, pixel: [u8; 4]) -> Frame {
        let rgba = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Frame::new(width, height, rgba)
    }

    #[test]
    fn encodes_png_at_native_size() {
        let surface = RasterSurface::from_frame(solid_frame(64, 32, [10, 20, 30, 255])).unwrap();
        assert_eq!((surface.width(), surface.height()), (64, 32));

        let bytes = surface.encode_png().unwrap();
        // PNG magic bytes
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
    }

    #[test]
    fn pixels_survive_unchanged() {
        let mut frame = solid_frame(3, 2, [0, 0, 0, 255]);
        // Top-right pixel
        frame.rgba[8..12].copy_from_slice(&[200, 100, 50, 128]);

        let bytes = RasterSurface::from_frame(frame).unwrap().encode_png().unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.get_pixel(2, 0).0, [200, 100, 50, 128]);
        assert_eq!(decoded.get_pixel(0, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn zero_dimension_fails() {
        let result = RasterSurface::from_frame(Frame::new(0, 10, Vec::new()));
        assert!(matches!(result, Err(RasterError::ZeroDimension)));
    }

    #[test]
    fn short_buffer_fails() {
        let result = RasterSurface::from_frame(Frame::new(4, 4, vec![0; 10]));
        assert!(matches!(
            result,
            Err(RasterError::BufferSize {
                expected: 64,
                actual: 10
            })
        ));
    }
}
