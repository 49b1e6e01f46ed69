use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AlphaError::shader_compile(ShaderStage::Fragment, "x")
            .to_string()
            .contains("shader compile error (fragment stage):")
    );
    assert!(
        AlphaError::program_link("x")
            .to_string()
            .contains("program link error:")
    );
    assert!(
        AlphaError::missing_location("uSTMatrix")
            .to_string()
            .contains("missing shader location: uSTMatrix")
    );
    assert!(
        AlphaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(AlphaError::state("x").to_string().contains("state error:"));
    assert_eq!(
        AlphaError::decoder(1, -1004, "io").to_string(),
        "decoder error: code=1 extra=-1004: io"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AlphaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn fatal_classification_covers_init_failures_only() {
    assert!(AlphaError::shader_compile(ShaderStage::Vertex, "").is_fatal());
    assert!(AlphaError::program_link("").is_fatal());
    assert!(AlphaError::missing_location("aPosition").is_fatal());
    assert!(AlphaError::shader_source("frag.glsl", "not found").is_fatal());

    assert!(!AlphaError::decoder(1, 0, "").is_fatal());
    assert!(!AlphaError::validation("").is_fatal());
    assert!(!AlphaError::state("").is_fatal());
}
