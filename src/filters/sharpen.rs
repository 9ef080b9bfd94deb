//! Unsharp mask with fixed weights: `1.2 * I - 0.2 * blur(I)`

use rayon::prelude::*;

use crate::{
    imgproc::{gaussian_blur_3x3, saturate_u8},
    video::types::Frame,
};

pub const ORIGINAL_WEIGHT: f32 = 1.2;
pub const BLUR_WEIGHT: f32 = -0.2;

pub fn apply(frame: &mut Frame) {
    let blurred = gaussian_blur_3x3(frame.as_image());

    let data: &mut [u8] = frame.as_image_mut();
    data.par_iter_mut()
        .zip(blurred.as_raw().par_iter())
        .for_each(|(value, &blur)| {
            *value = saturate_u8(ORIGINAL_WEIGHT * *value as f32 + BLUR_WEIGHT * blur as f32);
        });
}
