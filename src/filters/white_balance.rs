//! Gray-world white balance in Lab space
//!
//! Each chroma plane is shifted so that its mean lands on the neutral value,
//! then the user offset is added on top.

use image::GrayImage;

use crate::{
    imgproc::{saturate_u8, LabPlanes},
    params::EnhanceParams,
    video::types::Frame,
};

/// Packed-Lab value of zero chroma
pub const NEUTRAL_CHROMA: f64 = 128.0;

pub fn apply(frame: &mut Frame, params: &EnhanceParams) {
    let mut lab = LabPlanes::from_rgb(frame.as_image());

    neutralize(&mut lab.a, params.a_shift);
    neutralize(&mut lab.b, params.b_shift);

    *frame.as_image_mut() = lab.to_rgb();
}

/// Shift a chroma plane by `NEUTRAL_CHROMA - mean + shift`
pub fn neutralize(plane: &mut GrayImage, shift: i32) {
    let count = plane.as_raw().len();
    if count == 0 {
        return;
    }

    let mean = plane.as_raw().iter().map(|&v| v as f64).sum::<f64>() / count as f64;
    let offset = (NEUTRAL_CHROMA - mean) as f32 + shift as f32;

    for value in plane.iter_mut() {
        *value = saturate_u8(*value as f32 + offset);
    }
}
