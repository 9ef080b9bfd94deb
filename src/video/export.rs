//! Batch export of an enhanced copy of a whole video

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::params::EnhanceParams;
use crate::pipeline::EnhancePipeline;
use crate::video::sink::{EncoderSettings, FfmpegSink, FrameSink};
use crate::video::source::{FfmpegSource, FrameSource};
use crate::video::types::{ExportSummary, VideoMetadata};

/// Log progress every this many frames
const PROGRESS_INTERVAL: u64 = 100;

/// Re-encodes a video with every frame passed through the pipeline
#[derive(Debug, Clone)]
pub struct VideoExporter {
    pipeline: EnhancePipeline,
    output_path: PathBuf,
    encoder: EncoderSettings,
}

impl VideoExporter {
    pub fn new<P: Into<PathBuf>>(output_path: P, encoder: EncoderSettings) -> Self {
        Self {
            pipeline: EnhancePipeline::new(),
            output_path: output_path.into(),
            encoder,
        }
    }

    /// Export `source_path` from its first frame to its last.
    ///
    /// Output keeps the source resolution and frame rate.
    pub fn export<P: AsRef<Path>>(&self, source_path: P, params: &EnhanceParams) -> Result<ExportSummary> {
        let source_path = source_path.as_ref();
        info!("Exporting {} -> {}", source_path.display(), self.output_path.display());

        let mut source = FfmpegSource::open(source_path)?;
        let metadata = source.metadata().clone();
        let sink = export_frames(
            &self.pipeline,
            &mut source,
            |meta| FfmpegSink::create(&self.output_path, meta, &self.encoder),
            params,
        )?;

        Ok(ExportSummary {
            path: self.output_path.clone(),
            frames_written: sink.frames_written(),
            width: metadata.width,
            height: metadata.height,
            fps: metadata.fps,
        })
    }
}

/// Drain `source` through the pipeline into a sink opened with the source's
/// size and frame rate, then finish the sink.
///
/// Returns the finished sink.
pub fn export_frames<S, K, F>(
    pipeline: &EnhancePipeline,
    source: &mut S,
    open_sink: F,
    params: &EnhanceParams,
) -> Result<K>
where
    S: FrameSource + ?Sized,
    K: FrameSink,
    F: FnOnce(&VideoMetadata) -> Result<K>,
{
    let started = Instant::now();
    let expected = source.metadata().frame_count;
    let mut sink = open_sink(source.metadata())?;

    while let Some(frame) = source.next_frame()? {
        let enhanced = pipeline.process(&frame, params)?;
        sink.write_frame(&enhanced)?;

        let written = sink.frames_written();
        if written % PROGRESS_INTERVAL == 0 {
            match expected {
                Some(total) => info!("Exported {}/{} frames", written, total),
                None => info!("Exported {} frames", written),
            }
        } else {
            debug!("Exported frame {}", written);
        }
    }

    sink.finish()?;

    let written = sink.frames_written();
    info!(
        "Export finished: {} frames in {:.1}s",
        written,
        started.elapsed().as_secs_f64()
    );
    Ok(sink)
}
