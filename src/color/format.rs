use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::foundation::error::{AmbilightError, AmbilightResult};

/// Channel layout used both while sampling frames and for the emitted LED values.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// RGB plus a white channel `min(r, g, b)`.
    Rgbw,
    /// 8-bit hue/saturation/value (hue in `[0, 180)`).
    Hsv,
    /// RGB plus white `min(r, g, b)` and cold white `max(r, g, b)`.
    RgbwMix,
}

impl ColorFormat {
    /// All formats, in declaration order.
    pub const ALL: [ColorFormat; 4] = [Self::Rgb, Self::Rgbw, Self::Hsv, Self::RgbwMix];

    /// Number of channels a pixel in this format carries.
    pub fn channel_count(self) -> usize {
        match self {
            Self::Rgb | Self::Hsv => 3,
            Self::Rgbw => 4,
            Self::RgbwMix => 5,
        }
    }

    /// Lower-case name used on the command line and in output files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => "rgb",
            Self::Rgbw => "rgbw",
            Self::Hsv => "hsv",
            Self::RgbwMix => "rgbwmix",
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorFormat {
    type Err = AmbilightError;

    fn from_str(s: &str) -> AmbilightResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| {
                AmbilightError::validation(format!(
                    "unknown color format '{s}' (expected one of: rgb, rgbw, hsv, rgbwmix)"
                ))
            })
    }
}

/// One LED value: 3 to 5 channels, each in `[0, 255]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel(SmallVec<[u8; 5]>);

impl Pixel {
    /// Copy channels from a slice.
    pub fn from_slice(channels: &[u8]) -> Self {
        Self(SmallVec::from_slice(channels))
    }

    /// Borrow the channels.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Sum of all channels.
    pub fn channel_sum(&self) -> u32 {
        self.0.iter().map(|&c| u32::from(c)).sum()
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    pub(crate) fn push(&mut self, c: u8) {
        self.0.push(c);
    }
}

impl Deref for Pixel {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(v: [u8; 3]) -> Self {
        Self::from_slice(&v)
    }
}

impl From<Pixel> for Vec<u8> {
    fn from(p: Pixel) -> Self {
        p.0.into_vec()
    }
}

/// Extend an RGB triple to the channel layout of `format`.
///
/// `Hsv` is returned unchanged; conversion into HSV space happens on whole frames.
pub fn expand_rgb(format: ColorFormat, rgb: [u8; 3]) -> Pixel {
    let [r, g, b] = rgb;
    let mut px = Pixel::from(rgb);
    match format {
        ColorFormat::Rgb | ColorFormat::Hsv => {}
        ColorFormat::Rgbw => px.push(r.min(g).min(b)),
        ColorFormat::RgbwMix => {
            px.push(r.min(g).min(b));
            px.push(r.max(g).max(b));
        }
    }
    px
}

#[cfg(test)]
#[path = "../../tests/unit/color/format.rs"]
mod tests;
