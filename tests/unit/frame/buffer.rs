use super::*;

fn solid_frame(w: u32, h: u32, rgb: [u8; 3]) -> Frame {
    Frame::from_rgb_image(FrameIndex(0), RgbImage::from_pixel(w, h, image::Rgb(rgb)))
}

#[test]
fn validate_flags_malformed_frames() {
    assert!(solid_frame(4, 2, [1, 2, 3]).validate().is_ok());

    let mut short = solid_frame(4, 2, [1, 2, 3]);
    short.data.truncate(20);
    let err = short.validate().unwrap_err();
    assert!(matches!(err, AmbilightError::Frame(_)));

    let empty = Frame {
        index: FrameIndex(3),
        width: 0,
        height: 2,
        data: Vec::new(),
    };
    assert!(empty.validate().is_err());
}

#[test]
fn from_frame_expands_white_channels() {
    let frame = solid_frame(2, 1, [30, 60, 90]);
    let buf = ChannelBuffer::from_frame(&frame, ColorFormat::RgbwMix);
    assert_eq!(buf.channels(), 5);
    assert_eq!(buf.pixel(1, 0), &[30, 60, 90, 30, 90]);

    let buf = ChannelBuffer::from_frame(&frame, ColorFormat::Rgbw);
    assert_eq!(buf.pixel(0, 0), &[30, 60, 90, 30]);
}

#[test]
fn from_frame_converts_to_hsv() {
    let frame = solid_frame(1, 1, [0, 0, 255]);
    let buf = ChannelBuffer::from_frame(&frame, ColorFormat::Hsv);
    assert_eq!(buf.pixel(0, 0), &[120, 255, 255]);
}

#[test]
fn rows_and_columns_follow_image_axes() {
    let mut img = RgbImage::new(3, 2);
    for (x, y, p) in img.enumerate_pixels_mut() {
        *p = image::Rgb([x as u8, y as u8, 0]);
    }
    let buf = ChannelBuffer::from_frame(
        &Frame::from_rgb_image(FrameIndex(0), img),
        ColorFormat::Rgb,
    );
    let col: Vec<Vec<u8>> = buf.column(2).into_iter().map(Vec::from).collect();
    assert_eq!(col, vec![vec![2, 0, 0], vec![2, 1, 0]]);
    let row: Vec<Vec<u8>> = buf.row(1).into_iter().map(Vec::from).collect();
    assert_eq!(row, vec![vec![0, 1, 0], vec![1, 1, 0], vec![2, 1, 0]]);
}

#[test]
fn new_rejects_size_mismatch() {
    assert!(ChannelBuffer::new(2, 2, 3, vec![0; 11]).is_err());
    assert!(ChannelBuffer::new(2, 2, 6, vec![0; 24]).is_err());
    assert!(ChannelBuffer::new(2, 2, 4, vec![0; 16]).is_ok());
}

#[test]
fn only_three_channel_buffers_become_images() {
    let rgb = ChannelBuffer::new(1, 1, 3, vec![1, 2, 3]).unwrap();
    assert_eq!(rgb.into_rgb_image().unwrap().get_pixel(0, 0).0, [1, 2, 3]);
    let rgbw = ChannelBuffer::new(1, 1, 4, vec![1, 2, 3, 1]).unwrap();
    assert!(rgbw.into_rgb_image().is_err());
}
