use super::*;

fn solid(index: u64, width: u32, height: u32, rgb: [u8; 3]) -> Frame {
    Frame {
        index: FrameIndex(index),
        width,
        height,
        data: rgb.repeat(width as usize * height as usize),
    }
}

fn cfg(edge: EdgeSelection) -> ExtractConfig {
    ExtractConfig {
        target_height: 10,
        target_width: 16,
        ..ExtractConfig::new(edge)
    }
}

#[test]
fn solid_red_frame_yields_transformed_leds() {
    let ex = FrameExtractor::new(cfg(EdgeSelection::Left)).unwrap();
    let out = ex.extract(&solid(3, 64, 36, [200, 10, 10])).unwrap();
    assert_eq!(out.result.index, FrameIndex(3));
    assert_eq!(out.result.pixels.len(), 10);
    assert!(out.result.pixels.iter().all(|p| p.as_slice() == [216, 0, 0]));
    assert!(out.preview.is_none());
}

#[test]
fn output_format_sets_channel_count() {
    for (format, channels) in [
        (ColorFormat::Rgb, 3),
        (ColorFormat::Rgbw, 4),
        (ColorFormat::Hsv, 3),
        (ColorFormat::RgbwMix, 5),
    ] {
        let ex = FrameExtractor::new(ExtractConfig {
            output_color_format: format,
            ..cfg(EdgeSelection::Top)
        })
        .unwrap();
        let out = ex.extract(&solid(0, 40, 20, [120, 80, 40])).unwrap();
        assert_eq!(out.result.pixels.len(), 16);
        assert!(out.result.pixels.iter().all(|p| p.len() == channels));
    }
}

#[test]
fn preview_has_fitted_dimensions() {
    let ex = FrameExtractor::new(ExtractConfig {
        keep_preview: true,
        color_format: ColorFormat::Hsv,
        ..cfg(EdgeSelection::Right)
    })
    .unwrap();
    let out = ex.extract(&solid(0, 64, 36, [1, 2, 3])).unwrap();
    let preview = out.preview.unwrap();
    // 64 * 10 / 36 = 17.8
    assert_eq!(preview.dimensions(), (18, 10));
    assert!(preview.pixels().all(|p| p.0 == [1, 2, 3]));
}

#[test]
fn malformed_frame_is_a_frame_error() {
    let ex = FrameExtractor::new(cfg(EdgeSelection::Bottom)).unwrap();
    let mut frame = solid(5, 8, 8, [0, 0, 0]);
    frame.data.truncate(10);
    let err = ex.extract(&frame).unwrap_err();
    assert!(matches!(err, AmbilightError::Frame(_)));
}

#[test]
fn zero_target_is_rejected_at_construction() {
    let bad = ExtractConfig {
        target_height: 0,
        ..cfg(EdgeSelection::Left)
    };
    assert!(FrameExtractor::new(bad).is_err());
}
