use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{ImageBuffer, Rgb, RgbImage};

/// Represents a single 8-bit RGB frame
///
/// This is a thin wrapper around an RGB image buffer. Still images and
/// decoded video frames both end up as `Frame`s before entering the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb(color));
        Self { buffer }
    }

    /// Load a still image from disk, converting it to 8-bit RGB
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        Ok(Self::new(image::open(path)?.to_rgb8()))
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.buffer.put_pixel(x, y, Rgb(color));
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Get a mutable reference to the underlying image buffer
    pub fn as_image_mut(&mut self) -> &mut RgbImage {
        &mut self.buffer
    }

    /// Raw interleaved RGB bytes, row-major
    pub fn as_rgb_bytes(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Create a frame from raw RGB bytes
    pub fn from_rgb_bytes(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        ImageBuffer::from_raw(width, height, data).map(|buffer| Self { buffer })
    }

    /// Resize with bilinear filtering; returns a clone when the size already matches
    pub fn resized(&self, width: u32, height: u32) -> Self {
        if self.dimensions() == (width, height) {
            return self.clone();
        }
        Self::new(image::imageops::resize(
            &self.buffer,
            width,
            height,
            FilterType::Triangle,
        ))
    }

    /// Save the frame; the format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

/// Video stream metadata as reported by ffprobe
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,

    /// Frame count, when the container reports one
    pub frame_count: Option<u64>,
}

impl VideoMetadata {
    /// Size in bytes of one rgb24 frame
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Result of a completed batch export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub frames_written: u64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_frame() {
        let frame = Frame::new_filled(4, 3, [10, 20, 30]);
        assert_eq!(frame.dimensions(), (4, 3));
        assert_eq!(frame.get_pixel(3, 2), [10, 20, 30]);
        assert_eq!(frame.as_rgb_bytes().len(), 4 * 3 * 3);
    }

    #[test]
    fn test_from_rgb_bytes_rejects_short_buffer() {
        assert!(Frame::from_rgb_bytes(2, 2, vec![0; 11]).is_none());
        assert!(Frame::from_rgb_bytes(2, 2, vec![0; 12]).is_some());
    }

    #[test]
    fn test_resized() {
        let frame = Frame::new_filled(16, 8, [200, 100, 50]);
        let resized = frame.resized(9, 9);
        assert_eq!(resized.dimensions(), (9, 9));
        assert_eq!(resized.get_pixel(4, 4), [200, 100, 50]);
    }

    #[test]
    fn test_metadata_frame_len() {
        let meta = VideoMetadata {
            width: 640,
            height: 480,
            fps: 30.0,
            frame_count: None,
        };
        assert_eq!(meta.frame_len(), 640 * 480 * 3);
    }
}
