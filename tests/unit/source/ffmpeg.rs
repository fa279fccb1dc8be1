use super::*;

#[test]
fn frame_count_prefers_container_count() {
    let fps = Fps::new(25, 1).unwrap();
    assert_eq!(frame_count_hint(Some("120"), Some("10.0"), fps), 120);
    assert_eq!(frame_count_hint(Some("N/A"), Some("10.0"), fps), 250);
    assert_eq!(frame_count_hint(Some("0"), Some("2.5"), fps), 62);
    assert_eq!(frame_count_hint(None, None, fps), 0);
}

#[test]
fn read_full_reports_short_reads() {
    let mut r = std::io::Cursor::new(vec![7u8; 10]);
    let mut buf = [0u8; 6];
    assert_eq!(read_full(&mut r, &mut buf).unwrap(), 6);
    assert_eq!(read_full(&mut r, &mut buf).unwrap(), 4);
    assert_eq!(read_full(&mut r, &mut buf).unwrap(), 0);
}

#[test]
fn missing_file_is_a_source_error() {
    let err = FfmpegSource::open("/definitely/not/here.mp4").unwrap_err();
    assert!(matches!(err, AmbilightError::Source(_)));
}
