use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MapExportError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MapExportError::fetch("x")
            .to_string()
            .contains("fetch error:")
    );
    assert!(
        MapExportError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        MapExportError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        MapExportError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MapExportError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
