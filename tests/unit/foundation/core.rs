use super::*;

fn apply(m: &Mat4, u: f32, v: f32) -> (f32, f32) {
    // column-major: out = M * (u, v, 0, 1)
    let x = m[0] * u + m[4] * v + m[12];
    let y = m[1] * u + m[5] * v + m[13];
    (x, y)
}

#[test]
fn flip_v_maps_bottom_to_top() {
    assert_eq!(apply(&FLIP_V, 0.25, 0.0), (0.25, 1.0));
    assert_eq!(apply(&FLIP_V, 0.75, 1.0), (0.75, 0.0));
    assert_eq!(apply(&IDENTITY, 0.3, 0.6), (0.3, 0.6));
}

#[test]
fn non_empty_rejects_zero_dimensions() {
    assert!(PixelSize::non_empty(0, 10).is_err());
    assert!(PixelSize::non_empty(10, 0).is_err());
    let s = PixelSize::non_empty(4, 2).unwrap();
    assert_eq!(s.rgba8_len(), 32);
    assert_eq!(s.to_size(), Size::new(4.0, 2.0));
}

#[test]
fn orientation_follows_viewport_aspect() {
    assert_eq!(
        Orientation::from_viewport(PixelSize::new(1080, 1920)),
        Orientation::Portrait
    );
    assert_eq!(
        Orientation::from_viewport(PixelSize::new(1920, 1080)),
        Orientation::Landscape
    );
    assert_eq!(
        Orientation::from_viewport(PixelSize::new(500, 500)),
        Orientation::Portrait
    );
}
