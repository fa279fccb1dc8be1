//! 8-bit HSV conversions.
//!
//! Hue is stored halved (`[0, 180)`) so it fits a byte; saturation and value span `[0, 255]`.
//! RGB to HSV is fixed-point with 12 fractional bits; HSV to RGB goes through `f32` and rounds
//! half to even.

const HSV_SHIFT: u32 = 12;
const HSV_ROUND: i32 = 1 << (HSV_SHIFT - 1);
const HUE_RANGE: i32 = 180;

const SECTOR_DATA: [[usize; 3]; 6] = [
    [1, 3, 0],
    [1, 0, 2],
    [3, 0, 1],
    [0, 2, 1],
    [0, 1, 3],
    [2, 1, 0],
];

fn sat_divisor(v: i32) -> i32 {
    if v == 0 {
        return 0;
    }
    (f64::from(255 << HSV_SHIFT) / f64::from(v)).round_ties_even() as i32
}

fn hue_divisor(diff: i32) -> i32 {
    if diff == 0 {
        return 0;
    }
    (f64::from(HUE_RANGE << HSV_SHIFT) / (6.0 * f64::from(diff))).round_ties_even() as i32
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(i32::from);
    let v = r.max(g).max(b);
    let vmin = r.min(g).min(b);
    let diff = v - vmin;

    let s = (diff * sat_divisor(v) + HSV_ROUND) >> HSV_SHIFT;

    let h = if v == r {
        g - b
    } else if v == g {
        b - r + 2 * diff
    } else {
        r - g + 4 * diff
    };
    let mut h = (h * hue_divisor(diff) + HSV_ROUND) >> HSV_SHIFT;
    if h < 0 {
        h += HUE_RANGE;
    }

    [h.clamp(0, 255) as u8, s.clamp(0, 255) as u8, v as u8]
}

/// Convert one 8-bit HSV pixel back to RGB.
pub fn hsv_to_rgb(hsv: [u8; 3]) -> [u8; 3] {
    let hscale = 6.0f32 / HUE_RANGE as f32;
    let s = f32::from(hsv[1]) * (1.0 / 255.0);
    let v = f32::from(hsv[2]) * (1.0 / 255.0);

    let (r, g, b) = if s == 0.0 {
        (v, v, v)
    } else {
        let mut h = f32::from(hsv[0]) * hscale;
        while h < 0.0 {
            h += 6.0;
        }
        while h >= 6.0 {
            h -= 6.0;
        }
        let sector_f = h.floor();
        let mut frac = h - sector_f;
        let mut sector = sector_f as usize;
        if sector >= 6 {
            sector = 0;
            frac = 0.0;
        }

        let tab = [
            v,
            v * (1.0 - s),
            v * (1.0 - s * frac),
            v * (1.0 - s * (1.0 - frac)),
        ];
        let [bi, gi, ri] = SECTOR_DATA[sector];
        (tab[ri], tab[gi], tab[bi])
    };

    [r, g, b].map(|c| (c * 255.0).round_ties_even().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/color/hsv.rs"]
mod tests;
