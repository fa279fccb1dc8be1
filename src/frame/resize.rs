use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::frame::buffer::ChannelBuffer;

/// Source taps of one output sample: `(source index, weight)`, weights summing to one.
type Taps = Vec<(usize, f32)>;

/// Overlap weights for resampling `src_len` samples onto `dst_len` samples.
///
/// Each output sample covers `[d * scale, (d + 1) * scale)` in source space and averages every
/// source sample it overlaps, weighted by the overlap length.
fn area_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    (0..dst_len)
        .map(|d| {
            let start = f64::from(d) * scale;
            let end = (start + scale).min(f64::from(src_len));
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len as usize);
            let span = end - start;
            let mut taps = Taps::with_capacity(last.saturating_sub(first));
            for k in first..last {
                let overlap = end.min((k + 1) as f64) - start.max(k as f64);
                if overlap > 1e-9 {
                    taps.push((k, (overlap / span) as f32));
                }
            }
            taps
        })
        .collect()
}

/// Resize by area averaging.
///
/// Separable: columns are averaged first into an `f32` scratch buffer, then rows; values are
/// rounded once at the end.
pub fn resize_area(src: &ChannelBuffer, dst_w: u32, dst_h: u32) -> AmbilightResult<ChannelBuffer> {
    if dst_w == 0 || dst_h == 0 {
        return Err(AmbilightError::validation(format!(
            "resize target {dst_w}x{dst_h} must be non-zero"
        )));
    }
    let (src_w, src_h, ch) = (src.width(), src.height(), src.channels());
    if src_w == dst_w && src_h == dst_h {
        return Ok(src.clone());
    }

    let x_taps = area_taps(src_w, dst_w);
    let y_taps = area_taps(src_h, dst_h);
    let data = src.data();

    let row_stride = dst_w as usize * ch;
    let mut horiz = vec![0f32; row_stride * src_h as usize];
    for y in 0..src_h as usize {
        let src_row = &data[y * src_w as usize * ch..(y + 1) * src_w as usize * ch];
        let dst_row = &mut horiz[y * row_stride..(y + 1) * row_stride];
        for (dx, taps) in x_taps.iter().enumerate() {
            let out = &mut dst_row[dx * ch..(dx + 1) * ch];
            for &(sx, w) in taps {
                for (c, acc) in out.iter_mut().enumerate() {
                    *acc += f32::from(src_row[sx * ch + c]) * w;
                }
            }
        }
    }

    let mut out = vec![0u8; row_stride * dst_h as usize];
    let mut acc = vec![0f32; row_stride];
    for (dy, taps) in y_taps.iter().enumerate() {
        acc.iter_mut().for_each(|a| *a = 0.0);
        for &(sy, w) in taps {
            let src_row = &horiz[sy * row_stride..(sy + 1) * row_stride];
            for (a, &v) in acc.iter_mut().zip(src_row) {
                *a += v * w;
            }
        }
        let dst_row = &mut out[dy * row_stride..(dy + 1) * row_stride];
        for (o, &a) in dst_row.iter_mut().zip(&acc) {
            *o = a.round_ties_even().clamp(0.0, 255.0) as u8;
        }
    }

    ChannelBuffer::new(dst_w, dst_h, ch, out)
}

#[cfg(test)]
#[path = "../../tests/unit/frame/resize.rs"]
mod tests;
