use super::*;

#[test]
fn defaults_are_transparent_and_2d() {
    let cfg = RendererConfig::default();
    assert_eq!(cfg.texture_target, TextureTarget::Texture2d);
    assert_eq!(cfg.fragment_shader_name(), FRAGMENT_SHADER_2D);
    assert_eq!(cfg.scale_mode, ScaleMode::AspectFill);
    cfg.validate().unwrap();
}

#[test]
fn external_target_picks_oes_shader() {
    let cfg: RendererConfig =
        serde_json::from_str(r#"{ "texture_target": "external", "scale_mode": "fit-inside" }"#)
            .unwrap();
    assert_eq!(cfg.texture_target.gl_enum(), gl::TEXTURE_EXTERNAL_OES);
    assert_eq!(cfg.fragment_shader_name(), FRAGMENT_SHADER_OES);
    assert_eq!(cfg.scale_mode, ScaleMode::AspectFit);
}

#[test]
fn explicit_fragment_shader_wins() {
    let cfg = RendererConfig {
        fragment_shader: Some("custom.glsl".to_string()),
        ..RendererConfig::default()
    };
    assert_eq!(cfg.fragment_shader_name(), "custom.glsl");
}

#[test]
fn clear_color_is_not_configurable() {
    let err = serde_json::from_str::<RendererConfig>(r#"{ "clear_rgba": [0, 0, 0, 1] }"#)
        .unwrap_err();
    assert!(err.to_string().contains("clear_rgba"));
}

#[test]
fn validate_rejects_empty_shader_names() {
    let empty_fs = RendererConfig {
        fragment_shader: Some(String::new()),
        ..RendererConfig::default()
    };
    assert!(empty_fs.validate().is_err());

    let empty_vs = RendererConfig {
        vertex_shader: " ".to_string(),
        ..RendererConfig::default()
    };
    assert!(empty_vs.validate().is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = serde_json::from_str::<RendererConfig>(r#"{ "blend": "add" }"#).unwrap_err();
    assert!(err.to_string().contains("blend"));
}
