//! Local contrast enhancement: CLAHE on Lab lightness, chroma untouched

use crate::{
    imgproc::{Clahe, LabPlanes},
    params::EnhanceParams,
    video::types::Frame,
};

/// Tiles per side of the CLAHE grid
pub const CLAHE_TILES: u32 = 8;

/// Clip limits below this degenerate to a no-op equalization
pub const MIN_CLIP_LIMIT: f32 = 0.1;

pub fn effective_clip_limit(params: &EnhanceParams) -> f32 {
    params.clahe_clip.max(MIN_CLIP_LIMIT)
}

pub fn apply(frame: &mut Frame, params: &EnhanceParams) {
    let mut lab = LabPlanes::from_rgb(frame.as_image());
    lab.l = Clahe::new(effective_clip_limit(params), CLAHE_TILES).apply(&lab.l);
    *frame.as_image_mut() = lab.to_rgb();
}
