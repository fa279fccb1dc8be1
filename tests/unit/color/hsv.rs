use super::*;

#[test]
fn primaries_map_to_half_degree_hues() {
    assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
    assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
    assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
}

#[test]
fn grays_have_zero_saturation() {
    assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
    assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
    assert_eq!(hsv_to_rgb([90, 0, 77]), [77, 77, 77]);
}

#[test]
fn primaries_round_trip_exactly() {
    for rgb in [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0], [0, 0, 0]] {
        assert_eq!(hsv_to_rgb(rgb_to_hsv(rgb)), rgb, "rgb {rgb:?}");
    }
}

#[test]
fn mixed_colors_round_trip_within_quantization() {
    for rgb in [[200, 100, 50], [12, 180, 90], [90, 40, 220], [250, 249, 10]] {
        let back = hsv_to_rgb(rgb_to_hsv(rgb));
        for c in 0..3 {
            let d = (i32::from(back[c]) - i32::from(rgb[c])).abs();
            assert!(d <= 3, "rgb {rgb:?} came back as {back:?}");
        }
    }
}

#[test]
fn hue_stays_below_range() {
    for r in (0..=255).step_by(15) {
        for g in (0..=255).step_by(15) {
            for b in (0..=255).step_by(15) {
                let [h, _, _] = rgb_to_hsv([r as u8, g as u8, b as u8]);
                assert!(h < 180, "hue {h} for {r},{g},{b}");
            }
        }
    }
}
