//! Sequential frame sources
//!
//! [`FfmpegSource`] decodes a video file by reading raw `rgb24` frames from an
//! `ffmpeg` child process. [`MemorySource`] serves frames already in memory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::error::{Result, VideoError};
use crate::video::ffmpeg::{probe, read_full, spawn_error, ChildGuard};
use crate::video::types::{Frame, VideoMetadata};

/// A forward-only stream of frames that can be restarted from the beginning
pub trait FrameSource {
    fn metadata(&self) -> &VideoMetadata;

    /// Next frame, or `None` at end of stream
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Restart from the first frame
    fn rewind(&mut self) -> Result<()>;
}

/// Video file decoded through an `ffmpeg` pipe
pub struct FfmpegSource {
    path: PathBuf,
    metadata: VideoMetadata,
    decoder: Option<Decoder>,
    frames_read: u64,
}

struct Decoder {
    stdout: ChildStdout,
    process: ChildGuard,
}

impl FfmpegSource {
    /// Probe `path` and start decoding from the first frame
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = probe(&path)?;
        let decoder = Some(Self::spawn(&path)?);

        Ok(Self {
            path,
            metadata,
            decoder,
            frames_read: 0,
        })
    }

    fn spawn(path: &Path) -> Result<Decoder> {
        let path_str = path.display().to_string();

        let mut child = Command::new("ffmpeg")
            .args(decoder_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| spawn_error(e, &path_str))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VideoError::OpenFailed { path: path_str })?;

        Ok(Decoder {
            stdout,
            process: ChildGuard::new(child, "ffmpeg decoder"),
        })
    }
}

/// Decoder command line.
///
/// Rotation metadata is ignored so the raster keeps the stored width and
/// height reported by `probe`.
fn decoder_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-nostdin", "-noautorotate", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_owned());
    args.extend(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"].into_iter().map(OsString::from));
    args
}

impl FrameSource for FfmpegSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(None);
        };

        let mut buffer = vec![0u8; self.metadata.frame_len()];
        let filled = read_full(&mut decoder.stdout, &mut buffer).map_err(|e| {
            VideoError::DecodingFailed {
                reason: e.to_string(),
            }
        })?;

        if filled == buffer.len() {
            self.frames_read += 1;
            return Frame::from_rgb_bytes(self.metadata.width, self.metadata.height, buffer)
                .map(Some)
                .ok_or_else(|| {
                    VideoError::DecodingFailed {
                        reason: "decoded buffer does not match frame size".to_string(),
                    }
                    .into()
                });
        }

        if filled > 0 {
            warn!("Dropping truncated trailing frame ({} of {} bytes)", filled, buffer.len());
        }

        // end of stream: reap the decoder
        if let Some(decoder) = self.decoder.take() {
            drop(decoder.stdout);
            if let Err(reason) = decoder.process.wait() {
                if self.frames_read == 0 {
                    return Err(VideoError::DecodingFailed { reason }.into());
                }
                debug!("Decoder exited after {} frames: {}", self.frames_read, reason);
            }
        }

        debug!("End of stream after {} frames", self.frames_read);
        Ok(None)
    }

    fn rewind(&mut self) -> Result<()> {
        // dropping the old decoder kills it
        self.decoder = None;
        self.decoder = Some(Self::spawn(&self.path)?);
        self.frames_read = 0;
        debug!("Rewound {}", self.path.display());
        Ok(())
    }
}

/// Frames held in memory, mostly for tests and previews
#[derive(Debug, Clone)]
pub struct MemorySource {
    metadata: VideoMetadata,
    frames: Vec<Frame>,
    position: usize,
}

impl MemorySource {
    /// Build a source from frames that all share the given size
    pub fn new(frames: Vec<Frame>, fps: f64) -> Result<Self> {
        let (width, height) = frames.first().map(Frame::dimensions).unwrap_or((0, 0));

        if let Some(bad) = frames.iter().find(|f| f.dimensions() != (width, height)) {
            return Err(VideoError::FrameSizeMismatch {
                expected: (width, height),
                actual: bad.dimensions(),
            }
            .into());
        }

        Ok(Self {
            metadata: VideoMetadata {
                width,
                height,
                fps,
                frame_count: Some(frames.len() as u64),
            },
            frames,
            position: 0,
        })
    }
}

impl FrameSource for MemorySource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let frame = self.frames.get(self.position).cloned();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }

    fn rewind(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }
}
