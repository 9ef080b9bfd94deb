//! Frame sinks
//!
//! [`FfmpegSink`] pipes raw `rgb24` frames into an `ffmpeg` encoder process.
//! [`MemorySink`] collects frames in memory.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStderr, ChildStdin, Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::error::{Result, VideoError};
use crate::video::ffmpeg::{spawn_error, ChildGuard};
use crate::video::types::{Frame, VideoMetadata};

/// Destination for a sequence of equally sized frames
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and close the output
    fn finish(&mut self) -> Result<()>;

    fn frames_written(&self) -> u64;
}

/// Encoder selection for exported video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Four-character code written to the container
    pub codec_tag: String,
    /// ffmpeg encoder name
    pub encoder: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            codec_tag: "mp4v".to_string(),
            encoder: "mpeg4".to_string(),
        }
    }
}

/// Video file written through an `ffmpeg` pipe
pub struct FfmpegSink {
    path: PathBuf,
    size: (u32, u32),
    stdin: Option<ChildStdin>,
    process: Option<ChildGuard>,
    stderr: Option<JoinHandle<String>>,
    frames_written: u64,
}

impl FfmpegSink {
    /// Start an encoder writing `path` at the size and rate in `metadata`
    pub fn create<P: AsRef<Path>>(
        path: P,
        metadata: &VideoMetadata,
        settings: &EncoderSettings,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let path_str = path.display().to_string();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(VideoError::CreateOutputFailed { path: path_str }.into());
            }
        }

        let size = format!("{}x{}", metadata.width, metadata.height);
        let rate = metadata.fps.to_string();

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-y", "-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &size, "-r", &rate, "-i", "-"])
            .args(["-c:v", &settings.encoder, "-tag:v", &settings.codec_tag])
            .args(["-pix_fmt", "yuv420p"])
            .arg(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match spawn_error(e, &path_str) {
                VideoError::FfmpegMissing => VideoError::FfmpegMissing,
                _ => VideoError::CreateOutputFailed {
                    path: path_str.clone(),
                },
            })?;

        let stdin = child.stdin.take().ok_or_else(|| VideoError::CreateOutputFailed {
            path: path_str.clone(),
        })?;
        let stderr = child.stderr.take().map(drain_stderr);

        info!("Writing {} ({} @ {:.2}fps, {})", path_str, size, metadata.fps, settings.encoder);

        Ok(Self {
            path,
            size: (metadata.width, metadata.height),
            stdin: Some(stdin),
            process: Some(ChildGuard::new(child, "ffmpeg encoder")),
            stderr,
            frames_written: 0,
        })
    }
}

/// Read encoder diagnostics on a separate thread so a full pipe never stalls
/// frame writes
fn drain_stderr(mut pipe: ChildStderr) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        let _ = pipe.read_to_string(&mut text);
        text
    })
}

/// Exit status followed by whatever the encoder printed
fn encoder_failure(status: String, diagnostics: Option<String>) -> String {
    match diagnostics.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!("{}: {}", status, text),
        _ => status,
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if frame.dimensions() != self.size {
            return Err(VideoError::FrameSizeMismatch {
                expected: self.size,
                actual: frame.dimensions(),
            }
            .into());
        }

        let stdin = self.stdin.as_mut().ok_or_else(|| VideoError::EncodingFailed {
            reason: "encoder already finished".to_string(),
        })?;

        stdin
            .write_all(frame.as_rgb_bytes())
            .map_err(|e| VideoError::EncodingFailed {
                reason: e.to_string(),
            })?;

        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        // closing stdin tells ffmpeg the input is complete
        drop(self.stdin.take());

        if let Some(process) = self.process.take() {
            let status = process.wait();
            // the pipe closes when the encoder exits
            let diagnostics = self.stderr.take().and_then(|handle| handle.join().ok());
            status.map_err(|status| VideoError::EncodingFailed {
                reason: encoder_failure(status, diagnostics),
            })?;
            debug!("Encoder finished {} after {} frames", self.path.display(), self.frames_written);
        }
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

/// Collects written frames in memory
#[derive(Debug)]
pub struct MemorySink {
    /// Stream parameters the sink was created with
    pub metadata: VideoMetadata,
    pub frames: Vec<Frame>,
    pub finished: bool,
}

impl MemorySink {
    /// Sink accepting frames of the size in `metadata`
    pub fn create(metadata: &VideoMetadata) -> Self {
        Self {
            metadata: metadata.clone(),
            frames: Vec::new(),
            finished: false,
        }
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let expected = (self.metadata.width, self.metadata.height);
        if frame.dimensions() != expected {
            return Err(VideoError::FrameSizeMismatch {
                expected,
                actual: frame.dimensions(),
            }
            .into());
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encoder_settings() {
        let settings = EncoderSettings::default();
        assert_eq!(settings.codec_tag, "mp4v");
        assert_eq!(settings.encoder, "mpeg4");
    }

    #[test]
    fn test_memory_sink_rejects_size_change() {
        let meta = VideoMetadata {
            width: 2,
            height: 2,
            fps: 10.0,
            frame_count: None,
        };
        let mut sink = MemorySink::create(&meta);
        sink.write_frame(&Frame::new_filled(2, 2, [0; 3])).unwrap();
        assert!(sink.write_frame(&Frame::new_filled(4, 2, [0; 3])).is_err());
        assert_eq!(sink.frames_written(), 1);
        assert_eq!(sink.metadata, meta);
    }

    #[test]
    fn test_encoder_failure_appends_diagnostics() {
        assert_eq!(
            encoder_failure("exit status: 1".to_string(), Some("Unknown encoder 'x'\n".to_string())),
            "exit status: 1: Unknown encoder 'x'"
        );
        assert_eq!(encoder_failure("exit status: 1".to_string(), Some("  ".to_string())), "exit status: 1");
        assert_eq!(encoder_failure("exit status: 1".to_string(), None), "exit status: 1");
    }

    #[test]
    fn test_drained_stderr_is_collected() {
        let mut child = Command::new("sh")
            .args(["-c", "echo encoder noise >&2"])
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        let handle = drain_stderr(child.stderr.take().unwrap());
        child.wait().unwrap();
        assert_eq!(handle.join().unwrap().trim(), "encoder noise");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let meta = VideoMetadata {
            width: 4,
            height: 4,
            fps: 10.0,
            frame_count: None,
        };
        let result = FfmpegSink::create("/no/such/dir/out.mp4", &meta, &EncoderSettings::default());
        assert!(matches!(
            result,
            Err(crate::error::EnhanceError::Video(VideoError::CreateOutputFailed { .. }))
        ));
    }
}
