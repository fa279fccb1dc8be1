use std::sync::mpsc;

use image::RgbImage;

use crate::extract::edge::EdgeSelection;
use crate::extract::extractor::{ExtractConfig, FrameExtractor, FrameResult};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::output::preview::{PreviewConfig, PreviewSink};
use crate::pipeline::assemble::ResultAssembler;
use crate::pipeline::batch::{BatchIter, ScheduleOpts};
use crate::pipeline::smooth::{TemporalSmoother, validate_alpha};
use crate::pipeline::worker::{BatchOutput, FrameFailure, process_batch};
use crate::source::FrameSource;

/// Everything a run needs besides its source and sinks.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Per-frame extraction.
    pub extract: ExtractConfig,
    /// Selection, batching and workers.
    pub schedule: ScheduleOpts,
    /// Weight of the current frame in temporal smoothing, in `(0, 1]`.
    pub temporal_alpha: f64,
}

impl PipelineConfig {
    /// Defaults for everything except the edge.
    pub fn new(edge: EdgeSelection) -> Self {
        Self {
            extract: ExtractConfig::new(edge),
            schedule: ScheduleOpts::default(),
            temporal_alpha: 0.3,
        }
    }

    /// Validate every part.
    pub fn validate(&self) -> AmbilightResult<()> {
        self.extract.validate()?;
        self.schedule.validate()?;
        validate_alpha(self.temporal_alpha)
    }
}

/// Counters of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames pulled from the source.
    pub frames_read: u64,
    /// Frames that passed skip and cap.
    pub frames_selected: u64,
    /// Frames that produced LED values.
    pub frames_processed: u64,
    /// Selected frames dropped because of per-frame errors.
    pub frames_dropped: u64,
    /// Batches dispatched.
    pub batches: u64,
}

/// Result of [`run_pipeline`].
#[derive(Debug, Default)]
pub struct PipelineOutput {
    /// Smoothed LED frames in increasing index order.
    pub frames: Vec<FrameResult>,
    /// Dropped frames in increasing index order.
    pub failures: Vec<FrameFailure>,
    /// Counters.
    pub stats: RunStats,
}

type WorkerMsg = Result<BatchOutput, (u64, String)>;

/// Run the whole extraction over `source`.
///
/// Batches are dispatched to a dedicated worker pool, with at most
/// [`ScheduleOpts::in_flight_limit`] in flight; the reading thread blocks on completed batches once
/// the limit is reached. All batches are assembled before smoothing starts. When `preview` is
/// given, previews are enabled regardless of `cfg.extract.keep_preview` and streamed to the sink
/// in frame order while the run progresses.
#[tracing::instrument(
    skip_all,
    fields(
        edge = %cfg.extract.edge,
        workers = cfg.schedule.num_workers,
        batch_size = cfg.schedule.batch_size
    )
)]
pub fn run_pipeline(
    source: &mut dyn FrameSource,
    cfg: &PipelineConfig,
    preview: Option<&mut dyn PreviewSink>,
) -> AmbilightResult<PipelineOutput> {
    cfg.validate()?;
    let info = source.info().clone();
    tracing::info!(
        width = info.width,
        height = info.height,
        frames = info.frame_count,
        fps = info.fps.as_f64(),
        "starting extraction"
    );

    let mut extract_cfg = cfg.extract.clone();
    extract_cfg.keep_preview = preview.is_some();
    let extractor = FrameExtractor::new(extract_cfg)?;
    let pool = build_thread_pool(cfg.schedule.num_workers)?;
    let limit = cfg.schedule.in_flight_limit();

    let mut previews = PreviewStream::new(preview, info.fps);
    let mut assembler = ResultAssembler::new();
    let mut batches = BatchIter::new(source, &cfg.schedule);
    let mut dispatched = 0u64;

    let extractor = &extractor;
    pool.in_place_scope(|scope| -> AmbilightResult<()> {
        let (tx, rx) = mpsc::channel::<WorkerMsg>();
        let mut in_flight = 0usize;

        let mut dispatch = || -> AmbilightResult<()> {
            for batch in batches.by_ref() {
                let batch = batch?;
                while in_flight >= limit {
                    let msg = rx.recv().map_err(|_| {
                        AmbilightError::Other(anyhow::anyhow!("worker channel closed"))
                    })?;
                    in_flight -= 1;
                    previews.push_all(assembler.accept(worker_output(msg)?)?)?;
                }
                let tx = tx.clone();
                let seq = batch.seq;
                in_flight += 1;
                dispatched += 1;
                scope.spawn(move |_| {
                    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        process_batch(extractor, batch)
                    }))
                    .map_err(|_| (seq, "worker panicked".to_owned()));
                    let _ = tx.send(res);
                });
            }
            Ok(())
        };
        let dispatched_res = dispatch();
        drop(tx);

        // Every dispatched batch must report before the barrier is released, even on error.
        let mut drain_res = Ok(());
        while in_flight > 0 {
            let Ok(msg) = rx.recv() else {
                break;
            };
            in_flight -= 1;
            if drain_res.is_ok() && dispatched_res.is_ok() {
                drain_res = worker_output(msg)
                    .and_then(|out| assembler.accept(out))
                    .and_then(|ready| previews.push_all(ready));
            }
        }
        dispatched_res.and(drain_res)
    })?;

    let frames_read = batches.frames_read();
    let frames_selected = batches.frames_selected();
    previews.finish()?;

    let assembled = assembler.finish();
    let frames = TemporalSmoother::smooth_all(cfg.temporal_alpha, assembled.frames)?;
    let stats = RunStats {
        frames_read,
        frames_selected,
        frames_processed: frames.len() as u64,
        frames_dropped: assembled.failures.len() as u64,
        batches: dispatched,
    };
    tracing::info!(
        read = stats.frames_read,
        processed = stats.frames_processed,
        dropped = stats.frames_dropped,
        batches = stats.batches,
        "extraction finished"
    );
    Ok(PipelineOutput {
        frames,
        failures: assembled.failures,
        stats,
    })
}

fn worker_output(msg: WorkerMsg) -> AmbilightResult<BatchOutput> {
    msg.map_err(|(seq, why)| AmbilightError::Other(anyhow::anyhow!("batch {seq}: {why}")))
}

/// Lazily started preview sink: dimensions are taken from the first frame.
struct PreviewStream<'a> {
    sink: Option<&'a mut dyn PreviewSink>,
    fps: Fps,
    started: bool,
}

impl<'a> PreviewStream<'a> {
    fn new(sink: Option<&'a mut dyn PreviewSink>, fps: Fps) -> Self {
        Self {
            sink,
            fps,
            started: false,
        }
    }

    fn push_all(&mut self, frames: Vec<(FrameIndex, RgbImage)>) -> AmbilightResult<()> {
        let Some(sink) = self.sink.as_deref_mut() else {
            return Ok(());
        };
        for (idx, img) in frames {
            if !self.started {
                sink.begin(PreviewConfig {
                    width: img.width(),
                    height: img.height(),
                    fps: self.fps,
                })?;
                self.started = true;
            }
            sink.push_frame(idx, &img)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> AmbilightResult<()> {
        match self.sink.as_deref_mut() {
            Some(sink) if self.started => sink.end(),
            _ => Ok(()),
        }
    }
}

fn build_thread_pool(threads: usize) -> AmbilightResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(AmbilightError::validation("num_workers must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("ambilight-worker-{i}"))
        .build()
        .map_err(|e| {
            AmbilightError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
