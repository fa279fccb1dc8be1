use crate::foundation::error::{AmbilightError, AmbilightResult};

/// Absolute 0-based frame index in source-video order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> AmbilightResult<Self> {
        if den == 0 {
            return Err(AmbilightError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(AmbilightError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse an ffmpeg-style ratio such as `"30000/1001"` or a bare integer such as `"25"`.
    pub fn parse_ratio(s: &str) -> AmbilightResult<Self> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((a, b)) => (a.trim(), b.trim()),
            None => (s, "1"),
        };
        let num = num.parse::<u32>().map_err(|e| {
            AmbilightError::validation(format!("invalid fps numerator '{num}': {e}"))
        })?;
        let den = den.parse::<u32>().map_err(|e| {
            AmbilightError::validation(format!("invalid fps denominator '{den}': {e}"))
        })?;
        Self::new(num, den)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert seconds to frame count using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
