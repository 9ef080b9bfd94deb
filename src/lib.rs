//! # Underwater Enhancer
//!
//! Interactive enhancement of underwater photos and video with a fixed chain
//! of classical corrections: white balance, red-channel restoration, local
//! contrast (CLAHE), haze removal, sharpening and gamma.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use underwater_enhancer::{EnhanceParams, EnhancePipeline, Frame};
//!
//! # fn main() -> underwater_enhancer::Result<()> {
//! let frame = Frame::open("reef.jpg")?;
//! let enhanced = EnhancePipeline::new().process(&frame, &EnhanceParams::default())?;
//! enhanced.save("reef_enhanced.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`params`] - tunable parameters and slider events
//! - [`imgproc`] - Lab conversion, histograms, CLAHE, blur
//! - [`filters`] - the six enhancement stages
//! - [`pipeline`] - runs the stages in order
//! - [`video`] - frames and ffmpeg-backed decode, encode and export
//! - [`session`] - UI-independent viewer state machine
//! - [`viewer`] - the `eframe` window
//! - [`config`] - TOML configuration

pub mod config;
pub mod error;
pub mod filters;
pub mod imgproc;
pub mod params;
pub mod pipeline;
pub mod session;
pub mod video;
pub mod viewer;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{EnhanceError, Result},
    params::{EnhanceParams, ParamEvent, ParamKind},
    pipeline::EnhancePipeline,
    session::{Command, Mode, Session},
    video::{Frame, VideoExporter},
};
