//! Gamma correction through a 256-entry lookup table

use rayon::prelude::*;

use crate::{imgproc::saturate_u8, video::types::Frame};

/// Display gamma applied at the end of the pipeline
pub const GAMMA: f32 = 1.1;

/// `round(255 * (i / 255)^(1 / gamma))`
pub fn gamma_lut(gamma: f32) -> [u8; 256] {
    let inv = 1.0 / gamma;
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = saturate_u8(255.0 * (i as f32 / 255.0).powf(inv));
    }
    lut
}

pub fn apply_gamma(frame: &mut Frame, gamma: f32) {
    let lut = gamma_lut(gamma);
    let data: &mut [u8] = frame.as_image_mut();
    data.par_iter_mut()
        .for_each(|value| *value = lut[*value as usize]);
}

pub fn apply(frame: &mut Frame) {
    apply_gamma(frame, GAMMA);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_fixed() {
        let lut = gamma_lut(GAMMA);
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
        assert_eq!(lut[128], 136);
    }

    #[test]
    fn test_lut_is_monotonic_and_brightens() {
        let lut = gamma_lut(GAMMA);
        for i in 1..256 {
            assert!(lut[i] >= lut[i - 1]);
            assert!(lut[i] as usize >= i);
        }
    }

    #[test]
    fn test_round_trip_within_quantization() {
        let forward = gamma_lut(GAMMA);
        let inverse = gamma_lut(1.0 / GAMMA);
        for i in 0..256 {
            let back = inverse[forward[i] as usize] as i32;
            assert!((back - i as i32).abs() <= 2, "{} came back as {}", i, back);
        }
    }

    #[test]
    fn test_unit_gamma_is_identity() {
        let mut frame = Frame::new_filled(2, 2, [3, 99, 254]);
        apply_gamma(&mut frame, 1.0);
        assert_eq!(frame, Frame::new_filled(2, 2, [3, 99, 254]));
    }
}
