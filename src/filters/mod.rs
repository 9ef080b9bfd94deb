//! # Enhancement Stages
//!
//! The six corrections that make up one enhancement pass, in the order the
//! pipeline applies them:
//!
//! - **White balance**: gray-world neutralization of the Lab chroma planes
//! - **Red restore**: equalized red channel blended over the original
//! - **Local contrast**: CLAHE on Lab lightness
//! - **Dehaze**: atmospheric light and transmission map recovery
//! - **Sharpen**: fixed unsharp mask
//! - **Gamma**: brightening lookup table
//!
//! Every stage works in place on a [`Frame`] and keeps its dimensions.

pub mod dehaze;
pub mod gamma;
pub mod local_contrast;
pub mod red_restore;
pub mod sharpen;
pub mod white_balance;

use std::fmt;

use crate::{params::EnhanceParams, video::types::Frame};

/// One step of the enhancement pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    WhiteBalance,
    RedRestore,
    LocalContrast,
    Dehaze,
    Sharpen,
    Gamma,
}

impl Stage {
    /// Stages in pipeline order
    pub const ORDER: [Stage; 6] = [
        Stage::WhiteBalance,
        Stage::RedRestore,
        Stage::LocalContrast,
        Stage::Dehaze,
        Stage::Sharpen,
        Stage::Gamma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::WhiteBalance => "white_balance",
            Stage::RedRestore => "red_restore",
            Stage::LocalContrast => "local_contrast",
            Stage::Dehaze => "dehaze",
            Stage::Sharpen => "sharpen",
            Stage::Gamma => "gamma",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Stage::WhiteBalance => "Gray-world white balance on Lab chroma",
            Stage::RedRestore => "Blend equalized red channel back into the image",
            Stage::LocalContrast => "CLAHE on Lab lightness",
            Stage::Dehaze => "Atmospheric light and transmission map haze removal",
            Stage::Sharpen => "Unsharp mask",
            Stage::Gamma => "Gamma brightening",
        }
    }

    /// Apply this stage to `frame` in place
    pub fn apply(&self, frame: &mut Frame, params: &EnhanceParams) {
        match self {
            Stage::WhiteBalance => white_balance::apply(frame, params),
            Stage::RedRestore => red_restore::apply(frame, params),
            Stage::LocalContrast => local_contrast::apply(frame, params),
            Stage::Dehaze => dehaze::apply(frame, params),
            Stage::Sharpen => sharpen::apply(frame),
            Stage::Gamma => gamma::apply(frame),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
