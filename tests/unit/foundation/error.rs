use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChordError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ChordError::environment("x")
            .to_string()
            .contains("environment error:")
    );
    assert!(
        ChordError::synthesis("x")
            .to_string()
            .contains("frame synthesis error:")
    );
    assert!(ChordError::encode("x").to_string().contains("encoding error:"));
    assert!(ChordError::cancelled("x").to_string().contains("cancelled:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChordError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
