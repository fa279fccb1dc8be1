use std::collections::HashMap;

use image::RgbImage;

use crate::extract::extractor::FrameResult;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::pipeline::worker::{BatchOutput, FrameFailure};

/// Ordering barrier between the parallel workers and the sequential smoother.
///
/// Batch outputs may be accepted in any order. LED results are only released by [`finish`], sorted
/// by frame index, once every batch has been accepted. Previews are released earlier, batch by
/// batch, as soon as all lower sequence numbers have arrived.
///
/// [`finish`]: ResultAssembler::finish
#[derive(Debug, Default)]
pub struct ResultAssembler {
    results: Vec<FrameResult>,
    failures: Vec<FrameFailure>,
    pending_previews: HashMap<u64, Vec<(FrameIndex, RgbImage)>>,
    next_preview_seq: u64,
    accepted: u64,
}

/// Sorted output of a [`ResultAssembler`].
#[derive(Debug, Default)]
pub struct Assembled {
    /// Successful frames in increasing index order.
    pub frames: Vec<FrameResult>,
    /// Dropped frames in increasing index order.
    pub failures: Vec<FrameFailure>,
}

impl ResultAssembler {
    /// Empty assembler expecting batch sequence numbers from 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take one batch output. Returns the previews that are now in order.
    pub fn accept(&mut self, out: BatchOutput) -> AmbilightResult<Vec<(FrameIndex, RgbImage)>> {
        if out.seq < self.next_preview_seq || self.pending_previews.contains_key(&out.seq) {
            return Err(AmbilightError::validation(format!(
                "batch {} was already assembled",
                out.seq
            )));
        }
        self.accepted += 1;
        self.results.extend(out.results);
        self.failures.extend(out.failures);
        self.pending_previews.insert(out.seq, out.previews);

        let mut ready = Vec::new();
        while let Some(previews) = self.pending_previews.remove(&self.next_preview_seq) {
            ready.extend(previews);
            self.next_preview_seq += 1;
        }
        Ok(ready)
    }

    /// Batches accepted so far.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Sort and release everything collected.
    pub fn finish(self) -> Assembled {
        if !self.pending_previews.is_empty() {
            tracing::warn!(
                batches = self.pending_previews.len(),
                "previews after a missing batch were never streamed"
            );
        }
        let mut frames = self.results;
        frames.sort_unstable_by_key(|f| f.index);
        let mut failures = self.failures;
        failures.sort_unstable_by_key(|f| f.index);
        Assembled { frames, failures }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/assemble.rs"]
mod tests;
