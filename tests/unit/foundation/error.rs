use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        UnveilError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        UnveilError::manifest("x")
            .to_string()
            .contains("manifest error:")
    );
    assert!(
        UnveilError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = UnveilError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
