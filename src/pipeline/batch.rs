use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::frame::buffer::Frame;
use crate::source::FrameSource;

/// Frame selection, batching and worker-pool settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleOpts {
    /// Frames per batch. The last batch may be smaller.
    pub batch_size: usize,
    /// Worker threads.
    pub num_workers: usize,
    /// Stop after this many selected frames; `0` means no limit.
    pub max_frames: u64,
    /// Keep frame `i` only when `i % (frame_skip + 1) == 0`.
    pub frame_skip: u64,
    /// Dispatched but unfinished batches allowed at once. `None` means `2 * num_workers`.
    pub max_in_flight: Option<usize>,
}

impl Default for ScheduleOpts {
    fn default() -> Self {
        Self {
            batch_size: 100,
            num_workers: default_num_workers(),
            max_frames: 0,
            frame_skip: 0,
            max_in_flight: None,
        }
    }
}

impl ScheduleOpts {
    /// Reject zero sizes.
    pub fn validate(&self) -> AmbilightResult<()> {
        if self.batch_size == 0 {
            return Err(AmbilightError::validation("batch_size must be > 0"));
        }
        if self.num_workers == 0 {
            return Err(AmbilightError::validation("num_workers must be > 0"));
        }
        if self.max_in_flight == Some(0) {
            return Err(AmbilightError::validation(
                "max_in_flight must be > 0 when set",
            ));
        }
        Ok(())
    }

    /// Effective bound on in-flight batches.
    pub fn in_flight_limit(&self) -> usize {
        self.max_in_flight
            .unwrap_or_else(|| self.num_workers.saturating_mul(2))
            .max(1)
    }
}

/// Available parallelism minus one for the reading thread, at least one.
pub fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

/// Consecutive selected frames handed to one worker.
#[derive(Clone, Debug)]
pub struct Batch {
    /// Dispatch order, starting at 0.
    pub seq: u64,
    /// Frames in source order.
    pub frames: Vec<Frame>,
}

/// Lazily pulls frames from a source and groups the selected ones into batches.
///
/// Reading stops as soon as `max_frames` frames were selected, so the rest of the source is never
/// decoded. A source error ends iteration after being yielded once.
pub struct BatchIter<'a, S: FrameSource + ?Sized> {
    source: &'a mut S,
    batch_size: usize,
    frame_skip: u64,
    max_frames: u64,
    next_seq: u64,
    frames_read: u64,
    frames_selected: u64,
    done: bool,
}

impl<'a, S: FrameSource + ?Sized> BatchIter<'a, S> {
    /// Batch `source` according to `opts`.
    pub fn new(source: &'a mut S, opts: &ScheduleOpts) -> Self {
        Self {
            source,
            batch_size: opts.batch_size.max(1),
            frame_skip: opts.frame_skip,
            max_frames: opts.max_frames,
            next_seq: 0,
            frames_read: 0,
            frames_selected: 0,
            done: false,
        }
    }

    /// Frames pulled from the source so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Frames that passed skip and cap so far.
    pub fn frames_selected(&self) -> u64 {
        self.frames_selected
    }

    fn cap_reached(&self) -> bool {
        self.max_frames != 0 && self.frames_selected >= self.max_frames
    }
}

impl<S: FrameSource + ?Sized> Iterator for BatchIter<'_, S> {
    type Item = AmbilightResult<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut frames = Vec::with_capacity(self.batch_size);
        while frames.len() < self.batch_size {
            if self.cap_reached() {
                self.done = true;
                break;
            }
            match self.source.next_frame() {
                Ok(Some(frame)) => {
                    self.frames_read += 1;
                    if frame.index.0 % self.frame_skip.saturating_add(1) == 0 {
                        self.frames_selected += 1;
                        frames.push(frame);
                    }
                }
                Ok(None) => {
                    self.done = true;
                    break;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        if frames.is_empty() {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        Some(Ok(Batch { seq, frames }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/batch.rs"]
mod tests;
