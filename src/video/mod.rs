//! # Video Module
//!
//! Frames, still-image loading, and video decode/encode through the external
//! `ffmpeg` and `ffprobe` executables.
//!
//! Decoding and encoding sit behind the [`FrameSource`] and [`FrameSink`]
//! traits so the export loop can run against in-memory frames.

pub mod export;
pub mod ffmpeg;
pub mod sink;
pub mod source;
pub mod types;

pub use export::{export_frames, VideoExporter};
pub use ffmpeg::{ffmpeg_available, probe};
pub use sink::{EncoderSettings, FfmpegSink, FrameSink, MemorySink};
pub use source::{FfmpegSource, FrameSource, MemorySource};
pub use types::{ExportSummary, Frame, VideoMetadata};
