use super::*;
use crate::gpu::recording::RecordingGl;

const RGBA8: i32 = 0x8058;

#[test]
fn recording_gl_enforces_es2_upload_rules() {
    let gl = RecordingGl::new();
    gl.tex_image_2d(TEXTURE_2D, RGBA as i32, 1, 1, RGBA, UNSIGNED_BYTE, &[0; 4]);
    assert_eq!(gl.get_error(), NO_ERROR);

    gl.tex_image_2d(TEXTURE_2D, RGBA8, 1, 1, RGBA, UNSIGNED_BYTE, &[0; 4]);
    assert_eq!(gl.get_error(), INVALID_VALUE);

    gl.tex_image_2d(TEXTURE_EXTERNAL_OES, RGBA as i32, 1, 1, RGBA, UNSIGNED_BYTE, &[0; 4]);
    assert_eq!(gl.get_error(), INVALID_ENUM);
}

#[cfg(feature = "glow")]
#[test]
fn constants_match_glow() {
    let pairs = [
        (VERTEX_SHADER, glow::VERTEX_SHADER),
        (FRAGMENT_SHADER, glow::FRAGMENT_SHADER),
        (INVALID_ENUM, glow::INVALID_ENUM),
        (INVALID_VALUE, glow::INVALID_VALUE),
        (TEXTURE_2D, glow::TEXTURE_2D),
        (TEXTURE0, glow::TEXTURE0),
        (TEXTURE_MAG_FILTER, glow::TEXTURE_MAG_FILTER),
        (TEXTURE_MIN_FILTER, glow::TEXTURE_MIN_FILTER),
        (TEXTURE_WRAP_S, glow::TEXTURE_WRAP_S),
        (TEXTURE_WRAP_T, glow::TEXTURE_WRAP_T),
        (NEAREST, glow::NEAREST),
        (LINEAR, glow::LINEAR),
        (CLAMP_TO_EDGE, glow::CLAMP_TO_EDGE),
        (RGBA, glow::RGBA),
        (UNSIGNED_BYTE, glow::UNSIGNED_BYTE),
        (ARRAY_BUFFER, glow::ARRAY_BUFFER),
        (STATIC_DRAW, glow::STATIC_DRAW),
        (FLOAT, glow::FLOAT),
        (DEPTH_BUFFER_BIT, glow::DEPTH_BUFFER_BIT),
        (COLOR_BUFFER_BIT, glow::COLOR_BUFFER_BIT),
        (BLEND, glow::BLEND),
        (ONE, glow::ONE),
        (ONE_MINUS_SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA),
        (TRIANGLE_STRIP, glow::TRIANGLE_STRIP),
    ];
    for (ours, theirs) in pairs {
        assert_eq!(ours, theirs, "{ours:#x}");
    }
}
