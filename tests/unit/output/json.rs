use super::*;
use crate::color::format::Pixel;
use crate::foundation::core::FrameIndex;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "ambilight_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn sample_frames() -> Vec<FrameResult> {
    vec![
        FrameResult {
            index: FrameIndex(0),
            pixels: vec![Pixel::from([1, 2, 3]), Pixel::from([4, 5, 6])],
        },
        FrameResult {
            index: FrameIndex(2),
            pixels: vec![Pixel::from([7, 8, 9]), Pixel::from([10, 11, 12])],
        },
    ]
}

#[test]
fn records_layout_is_a_pretty_bare_array() {
    let dir = temp_dir("records_layout");
    let opts = OutputOpts::new(dir.join("nested").join("leds.json"));
    let path = write_output(&sample_frames(), ColorFormat::Rgb, &opts).unwrap();
    assert_eq!(path, dir.join("nested").join("leds.json"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n  {\n    \"frame\": 0,"));
    let back = read_records(&path).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back[1].frame, 2);
    assert_eq!(back[1].pixels, vec![vec![7, 8, 9], vec![10, 11, 12]]);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn directory_target_gets_default_name_and_gz_suffix() {
    let dir = temp_dir("dir_target");
    std::fs::create_dir_all(&dir).unwrap();
    let opts = OutputOpts {
        compress: true,
        layout: OutputLayout::Tagged,
        one_based_frames: true,
        ..OutputOpts::new(&dir)
    };
    let path = write_output(&sample_frames(), ColorFormat::Rgbw, &opts).unwrap();
    assert_eq!(path, dir.join("output.json.gz"));

    let raw = std::fs::read(&path).unwrap();
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);
    let back = read_records(&path).unwrap();
    assert_eq!(
        back.iter().map(|r| r.frame).collect::<Vec<_>>(),
        vec![1, 3]
    );
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn tagged_layout_names_the_color_format() {
    let dir = temp_dir("tagged_layout");
    let opts = OutputOpts {
        layout: OutputLayout::Tagged,
        ..OutputOpts::new(dir.join("out.json"))
    };
    let path = write_output(&sample_frames(), ColorFormat::RgbwMix, &opts).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["color_format"], "rgbwmix");
    assert_eq!(v["frames"].as_array().unwrap().len(), 2);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_path_is_rejected() {
    let err = write_output(&[], ColorFormat::Rgb, &OutputOpts::new("")).unwrap_err();
    assert!(matches!(err, AmbilightError::Validation(_)));
}

#[test]
fn layout_parses_from_cli_strings() {
    assert_eq!("Tagged".parse::<OutputLayout>().unwrap(), OutputLayout::Tagged);
    assert!("nested".parse::<OutputLayout>().is_err());
}
