use super::*;

#[test]
fn default_path_keeps_stem_and_extension() {
    let p = default_preview_path(Path::new("/videos/movie.mkv"), Path::new("/out"));
    assert_eq!(p, PathBuf::from("/out/movie_resized.mkv"));
    let p = default_preview_path(Path::new("clip"), Path::new("."));
    assert_eq!(p, PathBuf::from("./clip_resized.mp4"));
}

#[test]
fn in_memory_sink_records_frames_and_lifecycle() {
    let mut sink = InMemoryPreviewSink::new();
    let cfg = PreviewConfig {
        width: 2,
        height: 1,
        fps: Fps::default(),
    };
    sink.begin(cfg).unwrap();
    let img = RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
    sink.push_frame(FrameIndex(0), &img).unwrap();
    sink.push_frame(FrameIndex(4), &img).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg));
    assert!(sink.ended());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 4]);
}

#[test]
fn ffmpeg_sink_rejects_push_before_begin() {
    let mut sink = FfmpegPreviewSink::new(FfmpegPreviewOpts::new("/tmp/unused_preview.mp4"));
    let img = RgbImage::new(2, 2);
    assert!(sink.push_frame(FrameIndex(0), &img).is_err());
    assert!(sink.end().is_err());
}
