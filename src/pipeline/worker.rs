use image::RgbImage;

use crate::extract::extractor::{FrameExtractor, FrameResult};
use crate::foundation::core::FrameIndex;
use crate::pipeline::batch::Batch;

/// A frame dropped by a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFailure {
    /// Frame that failed.
    pub index: FrameIndex,
    /// Rendered error.
    pub message: String,
}

/// Everything one worker produced for one batch.
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Dispatch sequence number of the batch.
    pub seq: u64,
    /// Successful frames, in batch order.
    pub results: Vec<FrameResult>,
    /// Resized preview frames of the successful frames, in batch order.
    pub previews: Vec<(FrameIndex, RgbImage)>,
    /// Frames that failed and were dropped.
    pub failures: Vec<FrameFailure>,
}

/// Run the extractor over every frame of `batch`.
///
/// Per-frame errors are contained here: the frame is logged and dropped, the rest of the batch is
/// still processed.
pub fn process_batch(extractor: &FrameExtractor, batch: Batch) -> BatchOutput {
    let mut out = BatchOutput {
        seq: batch.seq,
        results: Vec::with_capacity(batch.frames.len()),
        ..BatchOutput::default()
    };
    for frame in &batch.frames {
        match extractor.extract(frame) {
            Ok(extracted) => {
                if let Some(img) = extracted.preview {
                    out.previews.push((frame.index, img));
                }
                out.results.push(extracted.result);
            }
            Err(e) => {
                tracing::warn!(frame = frame.index.0, error = %e, "dropping frame");
                out.failures.push(FrameFailure {
                    index: frame.index,
                    message: e.to_string(),
                });
            }
        }
    }
    tracing::debug!(
        seq = out.seq,
        frames = batch.frames.len(),
        failed = out.failures.len(),
        "batch done"
    );
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/worker.rs"]
mod tests;
