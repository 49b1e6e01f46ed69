use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "alphaplay-shaders-{tag}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn builtin_shaders_declare_required_symbols() {
    let vs = BuiltinShaders.load_text(VERTEX_SHADER).unwrap();
    for sym in ["aPosition", "aTextureCoord", "uMVPMatrix", "uSTMatrix"] {
        assert!(vs.contains(sym), "vertex shader lacks {sym}");
    }
    let oes = BuiltinShaders.load_text(FRAGMENT_SHADER_OES).unwrap();
    assert!(oes.contains("samplerExternalOES"));
    let tex2d = BuiltinShaders.load_text(FRAGMENT_SHADER_2D).unwrap();
    assert!(tex2d.contains("sampler2D"));
}

#[test]
fn builtin_unknown_name_is_a_source_error() {
    let err = BuiltinShaders.load_text("nope.glsl").unwrap_err();
    assert!(matches!(err, AlphaError::ShaderSource { ref name, .. } if name == "nope.glsl"));
    assert!(err.is_fatal());
}

#[test]
fn dir_source_reads_and_reports_missing_files() {
    let dir = scratch_dir("dir");
    std::fs::write(dir.join("v.glsl"), "void main() {}\n").unwrap();
    std::fs::write(dir.join("empty.glsl"), "  \n").unwrap();

    let src = DirShaderSource::new(&dir);
    assert_eq!(src.load_text("v.glsl").unwrap(), "void main() {}\n");

    let missing = src.load_text("missing.glsl").unwrap_err();
    assert!(missing.to_string().contains("missing.glsl"));
    assert!(src.load_text("empty.glsl").unwrap_err().to_string().contains("empty"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn static_sources_last_registration_wins() {
    let src = StaticShaders::new()
        .with("a", "one")
        .with("a", "two");
    assert_eq!(src.load_text("a").unwrap(), "two");
    assert!(src.load_text("b").is_err());
}
