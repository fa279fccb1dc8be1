use crate::color::format::{ColorFormat, Pixel};
use crate::color::hsv::{hsv_to_rgb, rgb_to_hsv};
use crate::foundation::error::{AmbilightError, AmbilightResult};

/// Parameters of the per-pixel transform. Built once per run and shared read-only by all workers.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformConfig {
    /// Sigmoid inflection point in normalized `[0, 1]` space.
    pub midpoint: f64,
    /// Sigmoid steepness.
    pub steepness: f64,
    /// Ceiling for the sum of all channels of one pixel.
    pub max_brightness: u32,
    /// Multiplier applied to HSV saturation of RGB pixels.
    pub saturation_factor: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            midpoint: 0.5,
            steepness: 10.0,
            max_brightness: 220,
            saturation_factor: 1.2,
        }
    }
}

impl TransformConfig {
    /// Reject non-finite parameters and negative saturation factors.
    pub fn validate(&self) -> AmbilightResult<()> {
        if !self.midpoint.is_finite() {
            return Err(AmbilightError::validation("midpoint must be finite"));
        }
        if !self.steepness.is_finite() {
            return Err(AmbilightError::validation("steepness must be finite"));
        }
        if !self.saturation_factor.is_finite() || self.saturation_factor < 0.0 {
            return Err(AmbilightError::validation(
                "saturation_factor must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Sigmoid tone curve for one channel value: `floor(255 / (1 + exp(-k * (v/255 - m))))`.
pub fn tone_map(value: u8, midpoint: f64, steepness: f64) -> u8 {
    let normalized = f64::from(value) / 255.0;
    let t = 1.0 / (1.0 + (-steepness * (normalized - midpoint)).exp());
    (t * 255.0).floor().clamp(0.0, 255.0) as u8
}

/// Scale every channel by `max / sum` when the channel sum exceeds `max`, truncating each result.
pub fn clamp_brightness(pixel: &mut Pixel, max_brightness: u32) {
    let total = pixel.channel_sum();
    if total <= max_brightness {
        return;
    }
    let scale = f64::from(max_brightness) / f64::from(total);
    for c in pixel.channels_mut() {
        *c = (f64::from(*c) * scale) as u8;
    }
}

/// Multiply the HSV saturation of an RGB pixel by `factor`. Other channel counts pass through.
pub fn boost_saturation(pixel: &mut Pixel, factor: f64) {
    let &[r, g, b] = pixel.as_slice() else {
        return;
    };
    let [h, s, v] = rgb_to_hsv([r, g, b]);
    let s = (f64::from(s) * factor).clamp(0.0, 255.0) as u8;
    let rgb = hsv_to_rgb([h, s, v]);
    pixel.channels_mut().copy_from_slice(&rgb);
}

/// Bring a sampled pixel to the channel count of `output`.
///
/// Extra channels are cut off; missing W/CW channels are derived from the first three channels.
pub fn reconcile_channels(mut pixel: Pixel, output: ColorFormat) -> Pixel {
    let want = output.channel_count();
    if pixel.len() >= want {
        pixel.truncate(want);
        return pixel;
    }
    if pixel.len() < 3 {
        return pixel;
    }
    let (r, g, b) = (pixel[0], pixel[1], pixel[2]);
    if pixel.len() == 3 {
        pixel.push(r.min(g).min(b));
    }
    if want == 5 {
        pixel.push(r.max(g).max(b));
    }
    pixel
}

/// The per-pixel transform chain: channel reconciliation, tone map, brightness clamp and
/// saturation boost.
///
/// The tone curve is tabulated once at construction; `apply` is pure and allocation-free for
/// pixels up to five channels.
#[derive(Clone, Debug)]
pub struct ColorPipeline {
    cfg: TransformConfig,
    output: ColorFormat,
    tone_lut: [u8; 256],
}

impl ColorPipeline {
    /// Tabulate the tone curve for `cfg`.
    pub fn new(cfg: TransformConfig, output: ColorFormat) -> Self {
        let mut tone_lut = [0u8; 256];
        for (v, slot) in tone_lut.iter_mut().enumerate() {
            *slot = tone_map(v as u8, cfg.midpoint, cfg.steepness);
        }
        Self {
            cfg,
            output,
            tone_lut,
        }
    }

    /// Transform one sampled pixel.
    pub fn apply(&self, pixel: Pixel) -> Pixel {
        let mut px = reconcile_channels(pixel, self.output);
        for c in px.channels_mut() {
            *c = self.tone_lut[usize::from(*c)];
        }
        clamp_brightness(&mut px, self.cfg.max_brightness);
        if self.output == ColorFormat::Rgb {
            boost_saturation(&mut px, self.cfg.saturation_factor);
        }
        px
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/transform.rs"]
mod tests;
