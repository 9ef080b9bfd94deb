//! 8-bit CIE L*a*b* conversion (sRGB, D65)
//!
//! Uses the 8-bit packing common in CV libraries: `L` scaled from 0..100 to
//! 0..255, `a` and `b` offset by 128.

use image::{GrayImage, RgbImage};
use rayon::prelude::*;

use super::saturate_u8;

/// D65 reference white
const WHITE_X: f32 = 0.950456;
const WHITE_Z: f32 = 1.088754;

/// CIE epsilon for the cube-root segment of f(t)
const EPSILON: f32 = 0.008856;
/// Inverse of the f(t) knee, (6/29)
const F_KNEE: f32 = 0.206893;
const KAPPA: f32 = 903.3;
const LINEAR_SLOPE: f32 = 7.787;
const LINEAR_OFFSET: f32 = 16.0 / 116.0;

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        LINEAR_SLOPE * t + LINEAR_OFFSET
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    if t > F_KNEE {
        t * t * t
    } else {
        (t - LINEAR_OFFSET) / LINEAR_SLOPE
    }
}

/// Convert one 8-bit sRGB pixel to packed 8-bit Lab
pub fn rgb_to_lab(pixel: [u8; 3]) -> [u8; 3] {
    let r = srgb_to_linear(pixel[0] as f32 / 255.0);
    let g = srgb_to_linear(pixel[1] as f32 / 255.0);
    let b = srgb_to_linear(pixel[2] as f32 / 255.0);

    let x = (0.412453 * r + 0.357580 * g + 0.180423 * b) / WHITE_X;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = (0.019334 * r + 0.119193 * g + 0.950227 * b) / WHITE_Z;

    let fx = lab_f(x);
    let fy = lab_f(y);
    let fz = lab_f(z);

    let l = if y > EPSILON { 116.0 * fy - 16.0 } else { KAPPA * y };

    [
        saturate_u8(l * 255.0 / 100.0),
        saturate_u8(500.0 * (fx - fy) + 128.0),
        saturate_u8(200.0 * (fy - fz) + 128.0),
    ]
}

/// Convert one packed 8-bit Lab pixel back to 8-bit sRGB
pub fn lab_to_rgb(pixel: [u8; 3]) -> [u8; 3] {
    let l = pixel[0] as f32 * 100.0 / 255.0;
    let a = pixel[1] as f32 - 128.0;
    let b = pixel[2] as f32 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = lab_f_inv(fx) * WHITE_X;
    let y = lab_f_inv(fy);
    let z = lab_f_inv(fz) * WHITE_Z;

    let r = 3.240479 * x - 1.537150 * y - 0.498535 * z;
    let g = -0.969256 * x + 1.875992 * y + 0.041556 * z;
    let b = 0.055648 * x - 0.204043 * y + 1.057311 * z;

    [
        saturate_u8(linear_to_srgb(r.clamp(0.0, 1.0)) * 255.0),
        saturate_u8(linear_to_srgb(g.clamp(0.0, 1.0)) * 255.0),
        saturate_u8(linear_to_srgb(b.clamp(0.0, 1.0)) * 255.0),
    ]
}

/// An image split into its packed Lab planes
#[derive(Debug, Clone)]
pub struct LabPlanes {
    pub l: GrayImage,
    pub a: GrayImage,
    pub b: GrayImage,
}

impl LabPlanes {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let lab: Vec<[u8; 3]> = image
            .as_raw()
            .par_chunks_exact(3)
            .map(|px| rgb_to_lab([px[0], px[1], px[2]]))
            .collect();

        let plane = |channel: usize| {
            let data = lab.iter().map(|px| px[channel]).collect();
            GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
        };

        Self {
            l: plane(0),
            a: plane(1),
            b: plane(2),
        }
    }

    pub fn to_rgb(&self) -> RgbImage {
        let (width, height) = self.l.dimensions();
        let mut out = RgbImage::new(width, height);

        out.par_chunks_exact_mut(3)
            .zip(self.l.as_raw().par_iter())
            .zip(self.a.as_raw().par_iter().zip(self.b.as_raw().par_iter()))
            .for_each(|((px, &l), (&a, &b))| px.copy_from_slice(&lab_to_rgb([l, a, b])));

        out
    }
}
