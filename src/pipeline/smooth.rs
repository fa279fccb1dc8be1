use crate::color::format::Pixel;
use crate::extract::extractor::FrameResult;
use crate::foundation::error::{AmbilightError, AmbilightResult};

/// Exponential moving average over consecutive frames, per LED and channel.
///
/// Each output is `round(alpha * current + (1 - alpha) * previous_output)`; the first frame passes
/// through unchanged. Frames must be pushed in increasing index order. Gaps are not special: the
/// state simply carries over to the next frame pushed.
#[derive(Clone, Debug)]
pub struct TemporalSmoother {
    alpha: f64,
    previous: Option<Vec<Pixel>>,
}

impl TemporalSmoother {
    /// `alpha` must lie in `(0, 1]`.
    pub fn new(alpha: f64) -> AmbilightResult<Self> {
        validate_alpha(alpha)?;
        Ok(Self {
            alpha,
            previous: None,
        })
    }

    /// Smooth one frame in place and remember it as the new state.
    pub fn push(&mut self, mut frame: FrameResult) -> FrameResult {
        if let Some(prev) = self.previous.as_ref() {
            if same_shape(prev, &frame.pixels) {
                let alpha = self.alpha;
                for (cur, prev) in frame.pixels.iter_mut().zip(prev) {
                    for (c, &p) in cur.channels_mut().iter_mut().zip(prev.iter()) {
                        let v = alpha * f64::from(*c) + (1.0 - alpha) * f64::from(p);
                        *c = v.round().clamp(0.0, 255.0) as u8;
                    }
                }
            } else {
                tracing::warn!(
                    frame = frame.index.0,
                    "led layout changed between frames, restarting smoothing"
                );
            }
        }
        self.previous = Some(frame.pixels.clone());
        frame
    }

    /// Smooth a whole ordered sequence.
    pub fn smooth_all(alpha: f64, frames: Vec<FrameResult>) -> AmbilightResult<Vec<FrameResult>> {
        let mut smoother = Self::new(alpha)?;
        Ok(frames.into_iter().map(|f| smoother.push(f)).collect())
    }
}

/// Reject values outside `(0, 1]`.
pub fn validate_alpha(alpha: f64) -> AmbilightResult<()> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(AmbilightError::validation(format!(
            "temporal_alpha must be in (0, 1], got {alpha}"
        )));
    }
    Ok(())
}

fn same_shape(a: &[Pixel], b: &[Pixel]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.len() == y.len())
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/smooth.rs"]
mod tests;
