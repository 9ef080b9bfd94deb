//! Red channel restoration
//!
//! Water absorbs red light first, so the red channel is equalized on its own
//! and blended back over the original by the user-selected strength.

use rayon::prelude::*;

use crate::{
    imgproc::{equalize_lut, extract_channel, histogram, saturate_u8},
    params::EnhanceParams,
    video::types::Frame,
};

pub fn apply(frame: &mut Frame, params: &EnhanceParams) {
    blend_equalized_red(frame, params.red_blend());
}

/// `r' = r * (1 - strength) + equalize(r) * strength`
pub fn blend_equalized_red(frame: &mut Frame, strength: f32) {
    let red = extract_channel(frame.as_image(), 0);
    let lut = equalize_lut(&histogram(red.as_raw()));
    let keep = 1.0 - strength;

    frame
        .as_image_mut()
        .par_chunks_exact_mut(3)
        .for_each(|px| {
            let r = px[0];
            px[0] = saturate_u8(r as f32 * keep + lut[r as usize] as f32 * strength);
        });
}
