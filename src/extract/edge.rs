use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::color::format::Pixel;
use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::frame::buffer::ChannelBuffer;
use crate::frame::resize::resize_area;

/// Frame edge the LED strip mirrors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSelection {
    /// First column.
    Left,
    /// Last column.
    Right,
    /// First row.
    Top,
    /// Last row.
    Bottom,
}

impl EdgeSelection {
    /// All edges, in declaration order.
    pub const ALL: [EdgeSelection; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Lower-case name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// `true` when samples run along the frame height.
    pub fn samples_height(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// LED count for this edge: `target_height` for side edges, `target_width` otherwise.
    pub fn target_count(self, target_height: u32, target_width: u32) -> u32 {
        if self.samples_height() {
            target_height
        } else {
            target_width
        }
    }

    /// Size a `width` x `height` frame is resized to before sampling.
    ///
    /// The sampling axis becomes `target_count`; the other axis keeps the aspect ratio,
    /// `round(other * target_count / sampling)`, and never drops below one pixel.
    pub fn fitted_size(self, width: u32, height: u32, target_count: u32) -> (u32, u32) {
        let scale = |other: u32, sampling: u32| -> u32 {
            let v = (f64::from(other) * f64::from(target_count) / f64::from(sampling)).round();
            (v as u32).max(1)
        };
        if self.samples_height() {
            if height == target_count {
                return (width, height);
            }
            (scale(width, height), target_count)
        } else {
            if width == target_count {
                return (width, height);
            }
            (target_count, scale(height, width))
        }
    }
}

impl fmt::Display for EdgeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeSelection {
    type Err = AmbilightError;

    fn from_str(s: &str) -> AmbilightResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| {
                AmbilightError::validation(format!(
                    "unknown edge selection '{s}' (expected one of: left, right, top, bottom)"
                ))
            })
    }
}

/// Resize `buf` so the sampling axis of `edge` is exactly `target_count` long.
///
/// Borrows `buf` unchanged when it already has that length.
pub fn fit_to_edge(
    buf: &ChannelBuffer,
    edge: EdgeSelection,
    target_count: u32,
) -> AmbilightResult<Cow<'_, ChannelBuffer>> {
    if target_count == 0 {
        return Err(AmbilightError::validation("target count must be > 0"));
    }
    if buf.width() == 0 || buf.height() == 0 {
        return Err(AmbilightError::frame("cannot sample an empty buffer"));
    }
    let (w, h) = edge.fitted_size(buf.width(), buf.height(), target_count);
    if (w, h) == (buf.width(), buf.height()) {
        return Ok(Cow::Borrowed(buf));
    }
    Ok(Cow::Owned(resize_area(buf, w, h)?))
}

/// Read the edge line of an already fitted buffer, reversed.
///
/// Side edges come out bottom to top, top/bottom edges right to left. LED wiring depends on this
/// order. An empty buffer has no edge and yields no pixels.
pub fn edge_line(buf: &ChannelBuffer, edge: EdgeSelection) -> Vec<Pixel> {
    if buf.width() == 0 || buf.height() == 0 {
        return Vec::new();
    }
    let mut line = match edge {
        EdgeSelection::Left => buf.column(0),
        EdgeSelection::Right => buf.column(buf.width() - 1),
        EdgeSelection::Top => buf.row(0),
        EdgeSelection::Bottom => buf.row(buf.height() - 1),
    };
    line.reverse();
    line
}

/// Fit `buf` to `edge` and sample exactly `target_count` pixels from it.
pub fn sample_edge(
    buf: &ChannelBuffer,
    edge: EdgeSelection,
    target_count: u32,
) -> AmbilightResult<Vec<Pixel>> {
    let fitted = fit_to_edge(buf, edge, target_count)?;
    Ok(edge_line(&fitted, edge))
}

#[cfg(test)]
#[path = "../../tests/unit/extract/edge.rs"]
mod tests;
