//! Haze removal with a global atmospheric light and a luma-derived
//! transmission map
//!
//! `t = clamp(1 - omega * gray / A, T_MIN, 1)` and `J = (I - A) / t + A`
//! per RGB channel.

use image::GrayImage;
use rayon::prelude::*;

use crate::{
    imgproc::{histogram, percentile, saturate_u8, to_gray},
    params::EnhanceParams,
    video::types::Frame,
};

/// Floor of the transmission map
pub const T_MIN: f32 = 0.35;

/// Luma percentile used as the atmospheric light
pub const ATMOSPHERIC_PERCENTILE: f64 = 95.0;

/// Lower bound on the atmospheric light so black frames never divide by zero
pub const MIN_ATMOSPHERIC_LIGHT: f32 = 1.0;

/// Estimate the atmospheric light of a grayscale frame
pub fn atmospheric_light(gray: &GrayImage) -> f32 {
    percentile(&histogram(gray.as_raw()), ATMOSPHERIC_PERCENTILE).max(MIN_ATMOSPHERIC_LIGHT)
}

/// Transmission for a single luma value
#[inline]
pub fn transmission(gray: u8, atmospheric: f32, omega: f32) -> f32 {
    (1.0 - omega * (gray as f32 / atmospheric)).clamp(T_MIN, 1.0)
}

/// Per-pixel transmission map, row-major
pub fn transmission_map(gray: &GrayImage, atmospheric: f32, omega: f32) -> Vec<f32> {
    gray.as_raw()
        .iter()
        .map(|&g| transmission(g, atmospheric, omega))
        .collect()
}

pub fn apply(frame: &mut Frame, params: &EnhanceParams) {
    let gray = to_gray(frame.as_image());
    let atmospheric = atmospheric_light(&gray);
    let omega = params.omega;

    // transmission only depends on the luma value
    let mut table = [0f32; 256];
    for (g, t) in table.iter_mut().enumerate() {
        *t = transmission(g as u8, atmospheric, omega);
    }

    frame
        .as_image_mut()
        .par_chunks_exact_mut(3)
        .zip(gray.as_raw().par_iter())
        .for_each(|(px, &g)| {
            let t = table[g as usize];
            for c in px.iter_mut() {
                *c = saturate_u8((*c as f32 - atmospheric) / t + atmospheric);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_gray_hits_t_min() {
        let gray = GrayImage::from_pixel(4, 4, image::Luma([140]));
        let a = atmospheric_light(&gray);
        assert_eq!(a, 140.0);
        assert!(transmission_map(&gray, a, 0.75).iter().all(|&t| t == T_MIN));
    }

    #[test]
    fn test_black_frame_is_guarded() {
        let gray = GrayImage::new(4, 4);
        let a = atmospheric_light(&gray);
        assert_eq!(a, MIN_ATMOSPHERIC_LIGHT);
        assert!(transmission_map(&gray, a, 0.75).iter().all(|&t| t == 1.0));

        let mut frame = Frame::new_filled(4, 4, [0, 0, 0]);
        apply(&mut frame, &EnhanceParams::default());
        assert_eq!(frame, Frame::new_filled(4, 4, [0, 0, 0]));
    }

    #[test]
    fn test_uniform_frame_is_fixed_point() {
        for value in [1u8, 77, 200, 255] {
            let mut frame = Frame::new_filled(3, 3, [value; 3]);
            apply(&mut frame, &EnhanceParams::default());
            assert_eq!(frame, Frame::new_filled(3, 3, [value; 3]));
        }
    }

    #[test]
    fn test_zero_omega_is_identity() {
        let mut frame = Frame::new_filled(2, 2, [30, 90, 160]);
        frame.set_pixel(1, 1, [220, 230, 240]);
        let original = frame.clone();

        let params = EnhanceParams {
            omega: 0.0,
            ..Default::default()
        };
        apply(&mut frame, &params);
        assert_eq!(frame, original);
    }

    #[test]
    fn test_dark_pixels_get_darker_under_haze() {
        let mut frame = Frame::new_filled(10, 10, [200, 200, 200]);
        frame.set_pixel(0, 0, [80, 80, 80]);
        apply(&mut frame, &EnhanceParams::default());
        assert!(frame.get_pixel(0, 0)[0] < 80);
    }
}
