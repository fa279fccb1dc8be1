use super::*;
use crate::foundation::core::FrameIndex;

fn frame(index: u64, px: &[[u8; 3]]) -> FrameResult {
    FrameResult {
        index: FrameIndex(index),
        pixels: px.iter().map(|&p| Pixel::from(p)).collect(),
    }
}

fn values(frames: &[FrameResult]) -> Vec<Vec<Vec<u8>>> {
    frames
        .iter()
        .map(|f| f.pixels.iter().map(|p| p.to_vec()).collect())
        .collect()
}

#[test]
fn first_frame_passes_through_and_later_frames_blend() {
    let out = TemporalSmoother::smooth_all(
        0.3,
        vec![frame(0, &[[100, 0, 255]]), frame(1, &[[200, 100, 0]])],
    )
    .unwrap();
    // 0.3 * 200 + 0.7 * 100 = 130, 0.3 * 100 = 30, 0.7 * 255 = 178.5
    assert_eq!(values(&out), vec![vec![vec![100, 0, 255]], vec![vec![130, 30, 179]]]);
}

#[test]
fn blending_uses_previous_smoothed_value() {
    let out = TemporalSmoother::smooth_all(
        0.5,
        vec![
            frame(0, &[[0, 0, 0]]),
            frame(1, &[[100, 100, 100]]),
            frame(2, &[[100, 100, 100]]),
        ],
    )
    .unwrap();
    assert_eq!(out[1].pixels[0].as_slice(), [50, 50, 50]);
    assert_eq!(out[2].pixels[0].as_slice(), [75, 75, 75]);
}

#[test]
fn alpha_one_is_identity() {
    let input: Vec<FrameResult> = (0..20u8)
        .map(|i| frame(u64::from(i), &[[i * 7, 255 - i, i], [3, i * 11, 90]]))
        .collect();
    let out = TemporalSmoother::smooth_all(1.0, input.clone()).unwrap();
    assert_eq!(out, input);
}

#[test]
fn constant_input_stays_constant() {
    for alpha in [0.01, 0.3, 0.77] {
        let input: Vec<FrameResult> = (0..50)
            .map(|i| frame(i, &[[216, 0, 0], [17, 99, 201]]))
            .collect();
        let out = TemporalSmoother::smooth_all(alpha, input.clone()).unwrap();
        assert_eq!(out, input, "alpha {alpha}");
    }
}

#[test]
fn gaps_carry_state_across() {
    let mut s = TemporalSmoother::new(0.5).unwrap();
    s.push(frame(0, &[[0, 0, 0]]));
    let f = s.push(frame(5, &[[200, 200, 200]]));
    assert_eq!(f.index, FrameIndex(5));
    assert_eq!(f.pixels[0].as_slice(), [100, 100, 100]);
}

#[test]
fn alpha_outside_range_is_rejected() {
    for alpha in [0.0, -0.1, 1.01, f64::NAN] {
        assert!(TemporalSmoother::new(alpha).is_err(), "alpha {alpha}");
    }
}
