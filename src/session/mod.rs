//! # Interactive Session
//!
//! The UI-independent half of the viewer. A [`Session`] owns the still image,
//! the open video stream (if any), the current parameters and the pipeline.
//! Each call to [`Session::step`] produces the next original/enhanced pair at
//! display resolution, and [`Session::dispatch`] handles key commands.
//!
//! Snapshot and export failures are reported through the status line and
//! the log; they never end the session.

mod backend;
mod command;

pub use backend::{FfmpegBackend, MediaBackend};
pub use command::{Command, Mode};

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::{Result, SessionError, VideoError};
use crate::params::{EnhanceParams, ParamEvent};
use crate::pipeline::EnhancePipeline;
use crate::video::{ExportSummary, Frame, FrameSource};

/// One rendered iteration, both frames at display resolution
#[derive(Debug, Clone)]
pub struct DisplayFrames {
    pub original: Frame,
    pub enhanced: Frame,
}

/// Session settings that do not change while it runs
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub display_size: (u32, u32),
    pub snapshot_path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            display_size: (900, 900),
            snapshot_path: PathBuf::from("enhanced_output.png"),
        }
    }
}

pub struct Session<B: MediaBackend> {
    backend: B,
    image: Frame,
    video: Option<B::Source>,
    mode: Mode,
    params: EnhanceParams,
    pipeline: EnhancePipeline,
    settings: SessionSettings,
    last_enhanced: Option<Frame>,
    status: String,
    running: bool,
}

impl<B: MediaBackend> Session<B> {
    /// Start a session in image mode
    pub fn new(backend: B, image: Frame, params: EnhanceParams, settings: SessionSettings) -> Self {
        Self {
            backend,
            image,
            video: None,
            mode: Mode::Image,
            params,
            pipeline: EnhancePipeline::new(),
            settings,
            last_enhanced: None,
            status: "Viewing image".to_string(),
            running: true,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn params(&self) -> &EnhanceParams {
        &self.params
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_open_video(&self) -> bool {
        self.video.is_some()
    }

    /// Last status message for the viewer
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Apply a slider change. Invalid values are dropped and the previous
    /// value is kept.
    pub fn apply_param(&mut self, event: ParamEvent) -> bool {
        match self.params.apply(event) {
            Ok(()) => true,
            Err(e) => {
                debug!("Ignoring parameter update: {}", e);
                false
            }
        }
    }

    /// Produce the next frame pair.
    ///
    /// In video mode the stream loops at its end. A stream that is still
    /// empty after rewinding is released and the session returns to the
    /// image.
    pub fn step(&mut self) -> Result<DisplayFrames> {
        let source = match self.next_source_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Video playback failed, returning to image: {}", e);
                self.release_video();
                self.mode = Mode::Image;
                self.status = format!("Video playback failed: {}", e.user_message());
                self.image.clone()
            }
        };

        let (width, height) = self.settings.display_size;
        let original = source.resized(width, height);
        let enhanced = self.pipeline.process(&original, &self.params)?;

        self.last_enhanced = Some(enhanced.clone());
        Ok(DisplayFrames { original, enhanced })
    }

    fn next_source_frame(&mut self) -> Result<Frame> {
        if self.mode == Mode::Image {
            return Ok(self.image.clone());
        }

        let video = self.video.as_mut().ok_or(SessionError::NoVideoSource)?;

        if let Some(frame) = video.next_frame()? {
            return Ok(frame);
        }

        debug!("End of video, looping");
        video.rewind()?;
        video
            .next_frame()?
            .ok_or_else(|| VideoError::EmptyStream.into())
    }

    /// Handle one command
    pub fn dispatch(&mut self, command: Command) {
        debug!("Command: {:?} in {} mode", command, self.mode);

        match command {
            Command::Quit => {
                info!("Quitting");
                self.release_video();
                self.running = false;
            }
            Command::ShowVideo => self.show_video(),
            Command::ShowImage => {
                self.release_video();
                self.mode = Mode::Image;
                self.status = "Viewing image".to_string();
                info!("Switched to image");
            }
            Command::Save => match self.mode {
                Mode::Image => self.report_snapshot(),
                Mode::Video => self.report_export(),
            },
            Command::Snapshot => self.report_snapshot(),
            Command::ExportVideo => self.report_export(),
        }
    }

    fn show_video(&mut self) {
        if self.video.is_none() {
            match self.backend.open_video() {
                Ok(source) => self.video = Some(source),
                Err(e) => {
                    warn!("Could not open video: {}", e);
                    self.status = e.user_message();
                    return;
                }
            }
        }

        self.mode = Mode::Video;
        self.status = "Viewing video".to_string();
        info!("Switched to video");
    }

    fn release_video(&mut self) {
        if self.video.take().is_some() {
            debug!("Released video source");
        }
    }

    /// Write the current enhanced frame to the snapshot path
    pub fn snapshot(&mut self) -> Result<PathBuf> {
        let frame = match &self.last_enhanced {
            Some(frame) => frame.clone(),
            None => {
                let (width, height) = self.settings.display_size;
                self.pipeline
                    .process(&self.image.resized(width, height), &self.params)?
            }
        };

        let path = self.settings.snapshot_path.clone();
        frame.save(&path)?;
        info!("Saved snapshot to {}", path.display());
        Ok(path)
    }

    /// Export the whole video with the current parameters
    pub fn export(&mut self) -> Result<ExportSummary> {
        let summary = self.backend.export(&self.params)?;
        info!(
            "Exported {} frames to {}",
            summary.frames_written,
            summary.path.display()
        );
        Ok(summary)
    }

    fn report_snapshot(&mut self) {
        self.status = match self.snapshot() {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => {
                warn!("Snapshot failed: {}", e);
                format!("Snapshot failed: {}", e.user_message())
            }
        };
    }

    fn report_export(&mut self) {
        self.status = match self.export() {
            Ok(summary) => format!(
                "Exported {} frames to {}",
                summary.frames_written,
                summary.path.display()
            ),
            Err(e) => {
                warn!("Export failed: {}", e);
                format!("Export failed: {}", e.user_message())
            }
        };
    }
}
