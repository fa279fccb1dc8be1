use super::*;

#[test]
fn channel_counts_match_layouts() {
    assert_eq!(ColorFormat::Rgb.channel_count(), 3);
    assert_eq!(ColorFormat::Rgbw.channel_count(), 4);
    assert_eq!(ColorFormat::Hsv.channel_count(), 3);
    assert_eq!(ColorFormat::RgbwMix.channel_count(), 5);
}

#[test]
fn parses_lowercase_names_and_rejects_unknown() {
    for f in ColorFormat::ALL {
        assert_eq!(f.as_str().parse::<ColorFormat>().unwrap(), f);
    }
    assert_eq!("RGBWMix".parse::<ColorFormat>().unwrap(), ColorFormat::RgbwMix);

    let err = "cmyk".parse::<ColorFormat>().unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn serde_names_match_cli_names() {
    let s = serde_json::to_string(&ColorFormat::RgbwMix).unwrap();
    assert_eq!(s, "\"rgbwmix\"");
    let f: ColorFormat = serde_json::from_str("\"rgbw\"").unwrap();
    assert_eq!(f, ColorFormat::Rgbw);
}

#[test]
fn expand_rgb_derives_white_channels() {
    assert_eq!(
        expand_rgb(ColorFormat::Rgb, [10, 20, 30]).as_slice(),
        &[10, 20, 30]
    );
    assert_eq!(
        expand_rgb(ColorFormat::Rgbw, [10, 20, 30]).as_slice(),
        &[10, 20, 30, 10]
    );
    assert_eq!(
        expand_rgb(ColorFormat::RgbwMix, [10, 20, 30]).as_slice(),
        &[10, 20, 30, 10, 30]
    );
}

#[test]
fn pixel_sum_and_conversion() {
    let p = Pixel::from_slice(&[200, 100, 50, 5]);
    assert_eq!(p.channel_sum(), 355);
    assert_eq!(p.len(), 4);
    let v: Vec<u8> = p.into();
    assert_eq!(v, vec![200, 100, 50, 5]);
}
