//! Helpers for driving the `ffmpeg` and `ffprobe` executables

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::{debug, info, warn};

use crate::error::{Result, VideoError};
use crate::video::types::VideoMetadata;

/// Check that both `ffmpeg` and `ffprobe` can be executed
pub fn ffmpeg_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|program| {
        Command::new(program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    })
}

/// Read width, height, frame rate and frame count of the first video stream
pub fn probe<P: AsRef<Path>>(path: P) -> Result<VideoMetadata> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    if !path.exists() {
        return Err(VideoError::OpenFailed { path: path_str }.into());
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,nb_frames",
            "-of",
            "default=noprint_wrappers=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| spawn_error(e, &path_str))?;

    if !output.status.success() {
        return Err(VideoError::ProbeFailed {
            path: path_str,
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let metadata = parse_probe_output(&stdout).ok_or_else(|| VideoError::ProbeFailed {
        path: path_str.clone(),
        reason: "no video stream with a known size and frame rate".to_string(),
    })?;

    info!(
        "Video metadata for {}: {}x{} @ {:.2}fps, {} frames",
        path_str,
        metadata.width,
        metadata.height,
        metadata.fps,
        metadata
            .frame_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );

    Ok(metadata)
}

/// Parse `key=value` lines printed by ffprobe
pub(crate) fn parse_probe_output(output: &str) -> Option<VideoMetadata> {
    let mut width = None;
    let mut height = None;
    let mut fps = None;
    let mut frame_count = None;

    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "width" => width = value.parse::<u32>().ok(),
            "height" => height = value.parse::<u32>().ok(),
            "r_frame_rate" => fps = parse_frame_rate(value),
            "nb_frames" => frame_count = value.parse::<u64>().ok(),
            _ => {}
        }
    }

    match (width, height, fps) {
        (Some(width), Some(height), Some(fps)) if width > 0 && height > 0 => Some(VideoMetadata {
            width,
            height,
            fps,
            frame_count,
        }),
        _ => None,
    }
}

/// Parse an ffprobe rate such as `30000/1001` or `25`
pub(crate) fn parse_frame_rate(rate: &str) -> Option<f64> {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };

    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Map a failed spawn to the error the user can act on
pub(crate) fn spawn_error(error: io::Error, path: &str) -> VideoError {
    if error.kind() == io::ErrorKind::NotFound {
        VideoError::FfmpegMissing
    } else {
        VideoError::OpenFailed {
            path: format!("{}: {}", path, error),
        }
    }
}

/// A child process that is killed and reaped when dropped
#[derive(Debug)]
pub(crate) struct ChildGuard {
    child: Option<Child>,
    label: &'static str,
}

impl ChildGuard {
    pub(crate) fn new(child: Child, label: &'static str) -> Self {
        debug!("Spawned {} process (pid {})", label, child.id());
        Self {
            child: Some(child),
            label,
        }
    }

    /// Wait for a normal exit; describes the exit status when the process failed
    pub(crate) fn wait(mut self) -> std::result::Result<(), String> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        match child.wait() {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(format!("{} exited with {}", self.label, status)),
            Err(e) => Err(format!("{} could not be reaped: {}", self.label, e)),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                // already exited
                debug!("Kill {} process: {}", self.label, e);
            }
            if let Err(e) = child.wait() {
                warn!("Failed to reap {} process: {}", self.label, e);
            }
        }
    }
}

/// Fill `buf` from `reader`, returning how many bytes were read before EOF
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
