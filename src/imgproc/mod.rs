//! # Image Primitives
//!
//! The computer-vision building blocks used by the filter stages, implemented
//! directly on `image` buffers:
//!
//! - [`lab`] - 8-bit CIE L*a*b* conversion and channel planes
//! - [`histogram`] - histograms, global equalization, percentiles
//! - [`clahe`] - contrast-limited adaptive histogram equalization
//! - [`blur`] - 3x3 Gaussian blur
//!
//! All primitives round floating-point intermediates back to 8 bits with
//! [`saturate_u8`], so every stage hands the next one a plain 8-bit image.

pub mod blur;
pub mod clahe;
pub mod histogram;
pub mod lab;

pub use blur::gaussian_blur_3x3;
pub use clahe::Clahe;
pub use histogram::{equalize_lut, histogram, percentile};
pub use lab::LabPlanes;

use image::{GrayImage, RgbImage};
use rayon::prelude::*;

/// Round to nearest and clamp into the 8-bit range
#[inline]
pub fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Luma of an RGB pixel with the fixed-point BT.601 weights used by common
/// CV libraries (0.299, 0.587, 0.114 scaled by 2^14)
#[inline]
pub fn luma(pixel: [u8; 3]) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    ((pixel[0] as u32 * R + pixel[1] as u32 * G + pixel[2] as u32 * B + (1 << 13)) >> 14) as u8
}

/// Grayscale version of an RGB image
pub fn to_gray(image: &RgbImage) -> GrayImage {
    let data: Vec<u8> = image
        .as_raw()
        .par_chunks_exact(3)
        .map(|px| luma([px[0], px[1], px[2]]))
        .collect();

    GrayImage::from_raw(image.width(), image.height(), data)
        .unwrap_or_else(|| GrayImage::new(image.width(), image.height()))
}

/// Extract one channel of an RGB image as a plane
pub fn extract_channel(image: &RgbImage, channel: usize) -> GrayImage {
    let data: Vec<u8> = image
        .as_raw()
        .par_chunks_exact(3)
        .map(|px| px[channel])
        .collect();

    GrayImage::from_raw(image.width(), image.height(), data)
        .unwrap_or_else(|| GrayImage::new(image.width(), image.height()))
}

/// Index into `0..len` with reflect-101 borders (`gfedcb|abcdefgh|gfedcba`)
#[inline]
pub(crate) fn reflect101(mut p: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }
    while p < 0 || p >= len {
        p = if p < 0 { -p } else { 2 * len - 2 - p };
    }
    p as usize
}
