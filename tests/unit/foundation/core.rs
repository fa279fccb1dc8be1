use super::*;

#[test]
fn fps_parses_ffmpeg_ratios() {
    let fps = Fps::parse_ratio("30000/1001").unwrap();
    assert_eq!(fps, Fps { num: 30000, den: 1001 });
    assert!((fps.as_f64() - 29.97).abs() < 0.01);

    assert_eq!(Fps::parse_ratio("25").unwrap(), Fps { num: 25, den: 1 });
}

#[test]
fn fps_rejects_zero_terms() {
    assert!(Fps::parse_ratio("0/1").is_err());
    assert!(Fps::parse_ratio("30/0").is_err());
    assert!(Fps::parse_ratio("abc").is_err());
}

#[test]
fn secs_to_frames_floors() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_floor(1.99), 59);
    assert_eq!(fps.secs_to_frames_floor(-1.0), 0);
}

#[test]
fn frame_index_orders_numerically() {
    let mut v = vec![FrameIndex(9), FrameIndex(2), FrameIndex(10)];
    v.sort();
    assert_eq!(v, vec![FrameIndex(2), FrameIndex(9), FrameIndex(10)]);
}
