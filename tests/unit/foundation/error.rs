use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StampError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StampError::asset("x").to_string().contains("asset error:"));
    assert!(StampError::render("x").to_string().contains("render error:"));
    assert!(
        StampError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StampError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
