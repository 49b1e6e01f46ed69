use super::*;

const EPS: f64 = 1e-6;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn geom(vw: f64, vh: f64, fw: f64, fh: f64, mode: ScaleMode) -> FrameGeometry {
    compute_geometry(Size::new(vw, vh), Size::new(fw, fh), mode).expect("valid dimensions")
}

#[test]
fn every_mode_stays_in_range() {
    let dims = [
        (100.0, 200.0, 200.0, 100.0),
        (1080.0, 1920.0, 1920.0, 1080.0),
        (1920.0, 1080.0, 540.0, 960.0),
        (300.0, 300.0, 300.0, 300.0),
        (1.0, 1000.0, 1000.0, 1.0),
    ];
    for (vw, vh, fw, fh) in dims {
        for mode in ScaleMode::ALL {
            let g = geom(vw, vh, fw, fh, mode);
            assert_eq!(g.vertices().len(), 4);
            for v in g.vertices() {
                assert!((-1.0..=1.0).contains(&v.position[0]), "{mode:?} {v:?}");
                assert!((-1.0..=1.0).contains(&v.position[1]), "{mode:?} {v:?}");
                assert_eq!(v.position[2], 0.0);
                assert!((0.0..=1.0).contains(&v.uv[0]), "{mode:?} {v:?}");
                assert!((0.0..=1.0).contains(&v.uv[1]), "{mode:?} {v:?}");
            }
        }
    }
}

#[test]
fn strip_order_is_bl_br_tl_tr() {
    let g = geom(100.0, 100.0, 100.0, 100.0, ScaleMode::Stretch);
    let p: Vec<[f32; 2]> = g
        .vertices()
        .iter()
        .map(|v| [v.position[0], v.position[1]])
        .collect();
    assert_eq!(p, vec![[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]]);
    let uv: Vec<[f32; 2]> = g.vertices().iter().map(|v| v.uv).collect();
    assert_eq!(uv, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
}

#[test]
fn fill_crops_u_for_wider_frame() {
    // viewport aspect 0.5, frame aspect 2.0: keep a quarter of the width.
    let g = geom(100.0, 200.0, 200.0, 100.0, ScaleMode::AspectFill);
    let uv = g.uv_bounds();
    assert!(close(uv.x0, 0.375) && close(uv.x1, 0.625), "{uv:?}");
    assert!(close(uv.y0, 0.0) && close(uv.y1, 1.0));
    assert!(close(uv.x0, 1.0 - uv.x1));

    let pos = g.position_bounds();
    assert_eq!(pos, Rect::new(-1.0, -1.0, 1.0, 1.0));
}

#[test]
fn fill_crops_v_for_taller_frame() {
    let g = geom(200.0, 100.0, 100.0, 200.0, ScaleMode::AspectFill);
    let uv = g.uv_bounds();
    assert!(close(uv.x0, 0.0) && close(uv.x1, 1.0));
    assert!(close(uv.y0, 0.375) && close(uv.y1, 0.625), "{uv:?}");
}

#[test]
fn fit_letterboxes_y_for_wider_frame() {
    let g = geom(100.0, 200.0, 200.0, 100.0, ScaleMode::AspectFit);
    let pos = g.position_bounds();
    assert!(close(pos.x0, -1.0) && close(pos.x1, 1.0));
    assert!(close(pos.y0, -0.25) && close(pos.y1, 0.25), "{pos:?}");
    assert_eq!(g.uv_bounds(), Rect::new(0.0, 0.0, 1.0, 1.0));
}

#[test]
fn fit_pillarboxes_x_for_taller_frame() {
    let g = geom(200.0, 100.0, 100.0, 200.0, ScaleMode::AspectFit);
    let pos = g.position_bounds();
    assert!(close(pos.x0, -0.25) && close(pos.x1, 0.25), "{pos:?}");
    assert!(close(pos.y0, -1.0) && close(pos.y1, 1.0));
}

#[test]
fn stretch_is_identity_mapping() {
    let g = geom(100.0, 200.0, 200.0, 100.0, ScaleMode::Stretch);
    assert_eq!(g, FrameGeometry::default());
}

#[test]
fn anchored_fill_keeps_requested_edge() {
    // Taller frame in a wide viewport: vertical crop.
    let top = geom(200.0, 100.0, 100.0, 200.0, ScaleMode::FillTop).uv_bounds();
    assert!(close(top.y1, 1.0) && close(top.y0, 0.75), "{top:?}");
    let bottom = geom(200.0, 100.0, 100.0, 200.0, ScaleMode::FillBottom).uv_bounds();
    assert!(close(bottom.y0, 0.0) && close(bottom.y1, 0.25), "{bottom:?}");

    // Wider frame in a tall viewport: horizontal crop.
    let left = geom(100.0, 200.0, 200.0, 100.0, ScaleMode::FillLeft).uv_bounds();
    assert!(close(left.x0, 0.0) && close(left.x1, 0.25), "{left:?}");
    let right = geom(100.0, 200.0, 200.0, 100.0, ScaleMode::FillRight).uv_bounds();
    assert!(close(right.x0, 0.75) && close(right.x1, 1.0), "{right:?}");

    // Anchor on the axis that is not cropped falls back to centering.
    let centered = geom(100.0, 200.0, 200.0, 100.0, ScaleMode::FillTop).uv_bounds();
    assert!(close(centered.x0, 0.375) && close(centered.x1, 0.625));
}

#[test]
fn anchored_fit_hugs_requested_edge() {
    let top = geom(100.0, 200.0, 200.0, 100.0, ScaleMode::FitTop).position_bounds();
    assert!(close(top.y1, 1.0) && close(top.y0, 0.5), "{top:?}");
    let bottom = geom(100.0, 200.0, 200.0, 100.0, ScaleMode::FitBottom).position_bounds();
    assert!(close(bottom.y0, -1.0) && close(bottom.y1, -0.5), "{bottom:?}");
    let left = geom(200.0, 100.0, 100.0, 200.0, ScaleMode::FitLeft).position_bounds();
    assert!(close(left.x0, -1.0) && close(left.x1, -0.5), "{left:?}");
    let right = geom(200.0, 100.0, 100.0, 200.0, ScaleMode::FitRight).position_bounds();
    assert!(close(right.x0, 0.5) && close(right.x1, 1.0), "{right:?}");
}

#[test]
fn invalid_dimensions_yield_none() {
    let ok = Size::new(10.0, 10.0);
    for bad in [
        Size::new(0.0, 10.0),
        Size::new(10.0, 0.0),
        Size::new(-5.0, 10.0),
        Size::new(f64::NAN, 10.0),
    ] {
        assert!(compute_geometry(bad, ok, ScaleMode::AspectFill).is_none());
        assert!(compute_geometry(ok, bad, ScaleMode::AspectFit).is_none());
    }
}

#[test]
fn compute_is_deterministic() {
    for mode in ScaleMode::ALL {
        let a = geom(1080.0, 1920.0, 960.0, 1080.0, mode);
        let b = geom(1080.0, 1920.0, 960.0, 1080.0, mode);
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }
}

#[test]
fn policy_keeps_previous_geometry_on_invalid_input() {
    let mut p = ScalePolicy::new(ScaleMode::AspectFill);
    assert!(!p.set_viewport(Size::new(100.0, 200.0)));
    assert!(p.set_frame(Size::new(200.0, 100.0)));
    let good = *p.geometry();
    let rev = p.revision();

    assert!(!p.set_viewport(Size::new(0.0, 200.0)));
    assert_eq!(*p.geometry(), good);
    assert_eq!(p.revision(), rev);

    assert!(!p.set_mode(ScaleMode::Stretch));
    assert_eq!(*p.geometry(), good);
}

#[test]
fn policy_replaces_geometry_on_mode_change() {
    let mut p = ScalePolicy::new(ScaleMode::AspectFill);
    p.set_viewport(Size::new(100.0, 200.0));
    p.set_frame_pixels(PixelSize::new(200, 100));
    let before = p.revision();
    assert!(p.set_mode(ScaleMode::AspectFit));
    assert_eq!(p.revision(), before + 1);
    assert!(close(p.geometry().position_bounds().y1, 0.25));
}

#[test]
fn vertex_layout_matches_interleaved_stride() {
    assert_eq!(VERTEX_STRIDE_BYTES, 20);
    assert_eq!(UV_OFFSET_BYTES, 12);
    assert_eq!(FrameGeometry::default().as_bytes().len(), 80);
}

#[test]
fn color_frame_is_half_width() {
    assert_eq!(
        color_frame_size(PixelSize::new(1920, 1080)),
        PixelSize::new(960, 1080)
    );
}

#[test]
fn scale_mode_accepts_descriptive_aliases() {
    let m: ScaleMode = serde_json::from_str("\"fill-and-crop\"").unwrap();
    assert_eq!(m, ScaleMode::AspectFill);
    let m: ScaleMode = serde_json::from_str("\"fit-inside\"").unwrap();
    assert_eq!(m, ScaleMode::AspectFit);
    let m: ScaleMode = serde_json::from_str("\"fit-top\"").unwrap();
    assert_eq!(m, ScaleMode::FitTop);
    assert_eq!(
        serde_json::to_string(&ScaleMode::Stretch).unwrap(),
        "\"stretch\""
    );
}
