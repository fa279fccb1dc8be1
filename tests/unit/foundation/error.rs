use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AmbilightError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        AmbilightError::source("x")
            .to_string()
            .contains("source error:")
    );
    assert!(
        AmbilightError::frame("x")
            .to_string()
            .contains("frame error:")
    );
    assert!(
        AmbilightError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        AmbilightError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AmbilightError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn constructors_pick_their_variant() {
    assert!(matches!(AmbilightError::frame("bad data"), AmbilightError::Frame(_)));
    assert!(matches!(AmbilightError::validation("x"), AmbilightError::Validation(_)));
    assert!(matches!(AmbilightError::source("x"), AmbilightError::Source(_)));
}
