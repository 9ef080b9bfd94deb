use std::path::PathBuf;

use crate::error::Result;
use crate::params::EnhanceParams;
use crate::video::{EncoderSettings, ExportSummary, FfmpegSource, FrameSource, VideoExporter};

/// Where a session gets its video frames and how it exports them
pub trait MediaBackend {
    type Source: FrameSource;

    /// Open the video for playback from its first frame
    fn open_video(&mut self) -> Result<Self::Source>;

    /// Export the whole video with the given parameters
    fn export(&mut self, params: &EnhanceParams) -> Result<ExportSummary>;
}

/// Backend that decodes and encodes through ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    video_path: PathBuf,
    exporter: VideoExporter,
}

impl FfmpegBackend {
    pub fn new<P, Q>(video_path: P, export_path: Q, encoder: EncoderSettings) -> Self
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        Self {
            video_path: video_path.into(),
            exporter: VideoExporter::new(export_path, encoder),
        }
    }
}

impl MediaBackend for FfmpegBackend {
    type Source = FfmpegSource;

    fn open_video(&mut self) -> Result<FfmpegSource> {
        FfmpegSource::open(&self.video_path)
    }

    fn export(&mut self, params: &EnhanceParams) -> Result<ExportSummary> {
        self.exporter.export(&self.video_path, params)
    }
}
