//! # Enhancement Pipeline
//!
//! Runs the filter stages over a frame in their fixed order. The input frame
//! is never modified; each call produces a fresh output frame of the same
//! size.

use std::time::Instant;

use tracing::debug;

use crate::{
    error::{FilterError, Result},
    filters::Stage,
    params::EnhanceParams,
    video::types::Frame,
};

/// The full enhancement chain
#[derive(Debug, Clone)]
pub struct EnhancePipeline {
    stages: Vec<Stage>,
}

impl Default for EnhancePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhancePipeline {
    /// Pipeline with every stage in the standard order
    pub fn new() -> Self {
        Self {
            stages: Stage::ORDER.to_vec(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Enhance one frame.
    ///
    /// Output has the dimensions of `frame`; empty frames pass straight
    /// through.
    pub fn process(&self, frame: &Frame, params: &EnhanceParams) -> Result<Frame> {
        let mut output = frame.clone();
        let expected = frame.dimensions();
        if expected.0 == 0 || expected.1 == 0 {
            return Ok(output);
        }

        let started = Instant::now();

        for stage in &self.stages {
            stage.apply(&mut output, params);

            let actual = output.dimensions();
            if actual != expected {
                return Err(FilterError::SizeMismatch {
                    stage: stage.name().to_string(),
                    expected,
                    actual,
                }
                .into());
            }
        }

        debug!(
            "Enhanced {}x{} frame in {:.1}ms",
            expected.0,
            expected.1,
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_not_modified() {
        let mut input = Frame::new_filled(8, 8, [30, 110, 140]);
        input.set_pixel(3, 3, [200, 40, 10]);
        let copy = input.clone();

        let pipeline = EnhancePipeline::new();
        let output = pipeline.process(&input, &EnhanceParams::default()).unwrap();

        assert_eq!(input, copy);
        assert_eq!(output.dimensions(), (8, 8));
    }

    #[test]
    fn test_solid_underwater_color_turns_white() {
        let input = Frame::new_filled(3, 3, [30, 110, 140]);
        let output = EnhancePipeline::new()
            .process(&input, &EnhanceParams::default())
            .unwrap();
        assert_eq!(output, Frame::new_filled(3, 3, [255, 255, 255]));
    }

    #[test]
    fn test_empty_frame_passes_through() {
        let input = Frame::new_filled(0, 0, [0, 0, 0]);
        let output = EnhancePipeline::new()
            .process(&input, &EnhanceParams::default())
            .unwrap();
        assert_eq!(output.dimensions(), (0, 0));
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(EnhancePipeline::new().stages(), &Stage::ORDER);
    }
}
