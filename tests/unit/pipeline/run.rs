use super::*;
use crate::output::preview::InMemoryPreviewSink;
use crate::source::memory::InMemorySource;

fn gradient_source(frames: usize) -> InMemorySource {
    let (w, h) = (24u32, 12u32);
    let buffers = (0..frames)
        .map(|i| {
            let mut data = Vec::with_capacity((w * h * 3) as usize);
            for y in 0..h {
                for x in 0..w {
                    data.extend_from_slice(&[
                        (x * 10 + i as u32 * 3) as u8,
                        (y * 20) as u8,
                        (i * 25) as u8,
                    ]);
                }
            }
            data
        })
        .collect();
    InMemorySource::from_raw(w, h, Fps::default(), buffers)
}

fn cfg(batch_size: usize, num_workers: usize) -> PipelineConfig {
    let mut cfg = PipelineConfig::new(EdgeSelection::Top);
    cfg.extract.target_width = 8;
    cfg.schedule = ScheduleOpts {
        batch_size,
        num_workers,
        max_frames: 0,
        frame_skip: 0,
        max_in_flight: Some(1),
    };
    cfg
}

#[test]
fn result_does_not_depend_on_batching_or_workers() {
    let baseline = run_pipeline(&mut gradient_source(11), &cfg(100, 1), None).unwrap();
    assert_eq!(baseline.frames.len(), 11);
    for (batch_size, workers) in [(1, 4), (3, 2), (4, 3), (11, 2)] {
        let out = run_pipeline(&mut gradient_source(11), &cfg(batch_size, workers), None).unwrap();
        assert_eq!(out.frames, baseline.frames, "batch {batch_size} workers {workers}");
    }
}

#[test]
fn stats_count_batches_and_frames() {
    let mut c = cfg(3, 2);
    c.schedule.frame_skip = 1;
    let out = run_pipeline(&mut gradient_source(10), &c, None).unwrap();
    assert_eq!(
        out.stats,
        RunStats {
            frames_read: 10,
            frames_selected: 5,
            frames_processed: 5,
            frames_dropped: 0,
            batches: 2,
        }
    );
}

#[test]
fn previews_stream_in_order_with_fitted_size() {
    let mut sink = InMemoryPreviewSink::new();
    let out = run_pipeline(&mut gradient_source(7), &cfg(2, 3), Some(&mut sink)).unwrap();
    assert_eq!(out.frames.len(), 7);
    assert!(sink.ended());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (8, 4));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..7).collect::<Vec<_>>());
}

#[test]
fn invalid_config_fails_before_reading() {
    let mut src = gradient_source(3);
    let mut c = cfg(2, 1);
    c.temporal_alpha = 0.0;
    assert!(matches!(
        run_pipeline(&mut src, &c, None),
        Err(AmbilightError::Validation(_))
    ));
    assert_eq!(src.remaining(), 3);
}
