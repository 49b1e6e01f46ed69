use kurbo::{Rect, Size};

use crate::foundation::core::PixelSize;

/// How the source frame's aspect ratio is reconciled with the viewport's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    /// Preserve aspect, fill the viewport, crop the overflow symmetrically.
    #[default]
    #[serde(alias = "fill-and-crop")]
    AspectFill,
    /// Preserve aspect, letterbox inside the viewport, centered.
    #[serde(alias = "fit-inside")]
    AspectFit,
    /// Ignore aspect; both extents map 1:1.
    #[serde(alias = "stretch-to-fill")]
    Stretch,
    /// Like `AspectFill`, but a vertical crop keeps the top edge.
    FillTop,
    /// Like `AspectFill`, but a vertical crop keeps the bottom edge.
    FillBottom,
    /// Like `AspectFill`, but a horizontal crop keeps the left edge.
    FillLeft,
    /// Like `AspectFill`, but a horizontal crop keeps the right edge.
    FillRight,
    /// Like `AspectFit`, but a vertical letterbox hugs the top edge.
    FitTop,
    /// Like `AspectFit`, but a vertical letterbox hugs the bottom edge.
    FitBottom,
    /// Like `AspectFit`, but a horizontal letterbox hugs the left edge.
    FitLeft,
    /// Like `AspectFit`, but a horizontal letterbox hugs the right edge.
    FitRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Policy {
    Stretch,
    Fill,
    Fit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl ScaleMode {
    fn split(self) -> (Policy, Anchor) {
        match self {
            Self::AspectFill => (Policy::Fill, Anchor::Center),
            Self::AspectFit => (Policy::Fit, Anchor::Center),
            Self::Stretch => (Policy::Stretch, Anchor::Center),
            Self::FillTop => (Policy::Fill, Anchor::Top),
            Self::FillBottom => (Policy::Fill, Anchor::Bottom),
            Self::FillLeft => (Policy::Fill, Anchor::Left),
            Self::FillRight => (Policy::Fill, Anchor::Right),
            Self::FitTop => (Policy::Fit, Anchor::Top),
            Self::FitBottom => (Policy::Fit, Anchor::Bottom),
            Self::FitLeft => (Policy::Fit, Anchor::Left),
            Self::FitRight => (Policy::Fit, Anchor::Right),
        }
    }

    /// All supported modes, in declaration order.
    pub const ALL: [ScaleMode; 11] = [
        Self::AspectFill,
        Self::AspectFit,
        Self::Stretch,
        Self::FillTop,
        Self::FillBottom,
        Self::FillLeft,
        Self::FillRight,
        Self::FitTop,
        Self::FitBottom,
        Self::FitLeft,
        Self::FitRight,
    ];
}

/// One quad corner: clip-space position (`z` is always 0) and texture coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Byte stride of one interleaved [`Vertex`] (X, Y, Z, U, V).
pub const VERTEX_STRIDE_BYTES: i32 = std::mem::size_of::<Vertex>() as i32;
/// Byte offset of the position triple inside a [`Vertex`].
pub const POSITION_OFFSET_BYTES: i32 = 0;
/// Byte offset of the texture coordinate pair inside a [`Vertex`].
pub const UV_OFFSET_BYTES: i32 = 3 * std::mem::size_of::<f32>() as i32;

/// Four vertices in triangle-strip order: bottom-left, bottom-right, top-left, top-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGeometry {
    vertices: [Vertex; 4],
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::from_rects(Rect::new(-1.0, -1.0, 1.0, 1.0), Rect::new(0.0, 0.0, 1.0, 1.0))
    }
}

impl FrameGeometry {
    /// `pos` is in clip space, `uv` in texture space; both with y/v growing upward.
    fn from_rects(pos: Rect, uv: Rect) -> Self {
        let v = |x: f64, y: f64, u: f64, t: f64| Vertex {
            position: [x as f32, y as f32, 0.0],
            uv: [u as f32, t as f32],
        };
        Self {
            vertices: [
                v(pos.x0, pos.y0, uv.x0, uv.y0),
                v(pos.x1, pos.y0, uv.x1, uv.y0),
                v(pos.x0, pos.y1, uv.x0, uv.y1),
                v(pos.x1, pos.y1, uv.x1, uv.y1),
            ],
        }
    }

    pub fn vertices(&self) -> &[Vertex; 4] {
        &self.vertices
    }

    /// Interleaved bytes ready for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Clip-space extent covered by the quad.
    pub fn position_bounds(&self) -> Rect {
        let [bl, _, _, tr] = self.vertices;
        Rect::new(
            f64::from(bl.position[0]),
            f64::from(bl.position[1]),
            f64::from(tr.position[0]),
            f64::from(tr.position[1]),
        )
    }

    /// Texture-space extent sampled by the quad.
    pub fn uv_bounds(&self) -> Rect {
        let [bl, _, _, tr] = self.vertices;
        Rect::new(
            f64::from(bl.uv[0]),
            f64::from(bl.uv[1]),
            f64::from(tr.uv[0]),
            f64::from(tr.uv[1]),
        )
    }
}

fn is_drawable(s: Size) -> bool {
    s.width > 0.0 && s.height > 0.0 && s.width.is_finite() && s.height.is_finite()
}

/// Sub-span of `[lo, hi]` covering `frac` of it, pinned to the low end, the high end, or the
/// middle.
fn span(lo: f64, hi: f64, frac: f64, pin_low: bool, pin_high: bool) -> (f64, f64) {
    let len = (hi - lo) * frac;
    if pin_low {
        (lo, lo + len)
    } else if pin_high {
        (hi - len, hi)
    } else {
        let mid = (lo + hi) * 0.5;
        (mid - len * 0.5, mid + len * 0.5)
    }
}

/// Compute the quad for `frame` shown in `viewport` under `mode`.
///
/// Returns `None` when any dimension is zero, negative or non-finite; callers keep their
/// previous geometry in that case (see [`ScalePolicy`]).
pub fn compute_geometry(viewport: Size, frame: Size, mode: ScaleMode) -> Option<FrameGeometry> {
    if !is_drawable(viewport) || !is_drawable(frame) {
        return None;
    }

    let viewport_aspect = viewport.width / viewport.height;
    let frame_aspect = frame.width / frame.height;

    let mut pos = Rect::new(-1.0, -1.0, 1.0, 1.0);
    let mut uv = Rect::new(0.0, 0.0, 1.0, 1.0);

    let (policy, anchor) = mode.split();
    match policy {
        Policy::Stretch => {}
        Policy::Fill => {
            if frame_aspect > viewport_aspect {
                let keep = viewport_aspect / frame_aspect;
                (uv.x0, uv.x1) = span(
                    0.0,
                    1.0,
                    keep,
                    anchor == Anchor::Left,
                    anchor == Anchor::Right,
                );
            } else if frame_aspect < viewport_aspect {
                let keep = frame_aspect / viewport_aspect;
                (uv.y0, uv.y1) = span(
                    0.0,
                    1.0,
                    keep,
                    anchor == Anchor::Bottom,
                    anchor == Anchor::Top,
                );
            }
        }
        Policy::Fit => {
            if frame_aspect > viewport_aspect {
                let keep = viewport_aspect / frame_aspect;
                (pos.y0, pos.y1) = span(
                    -1.0,
                    1.0,
                    keep,
                    anchor == Anchor::Bottom,
                    anchor == Anchor::Top,
                );
            } else if frame_aspect < viewport_aspect {
                let keep = frame_aspect / viewport_aspect;
                (pos.x0, pos.x1) = span(
                    -1.0,
                    1.0,
                    keep,
                    anchor == Anchor::Left,
                    anchor == Anchor::Right,
                );
            }
        }
    }

    Some(FrameGeometry::from_rects(pos, uv))
}

/// Owns the current quad and recomputes it when inputs change.
///
/// Invalid measurements leave the last good geometry in place.
#[derive(Clone, Debug)]
pub struct ScalePolicy {
    mode: ScaleMode,
    viewport: Option<Size>,
    frame: Option<Size>,
    geometry: FrameGeometry,
    revision: u64,
}

impl Default for ScalePolicy {
    fn default() -> Self {
        Self::new(ScaleMode::default())
    }
}

impl ScalePolicy {
    pub fn new(mode: ScaleMode) -> Self {
        Self {
            mode,
            viewport: None,
            frame: None,
            geometry: FrameGeometry::default(),
            revision: 0,
        }
    }

    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    /// Bumped every time the geometry is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_mode(&mut self, mode: ScaleMode) -> bool {
        self.mode = mode;
        self.recompute()
    }

    pub fn set_viewport(&mut self, viewport: Size) -> bool {
        self.viewport = Some(viewport);
        self.recompute()
    }

    pub fn set_frame(&mut self, frame: Size) -> bool {
        self.frame = Some(frame);
        self.recompute()
    }

    /// Convenience for the decoder-facing path.
    pub fn set_frame_pixels(&mut self, frame: PixelSize) -> bool {
        self.set_frame(frame.to_size())
    }

    fn recompute(&mut self) -> bool {
        let (Some(viewport), Some(frame)) = (self.viewport, self.frame) else {
            return false;
        };
        let Some(next) = compute_geometry(viewport, frame, self.mode) else {
            tracing::debug!(?viewport, ?frame, "geometry recompute skipped: not measurable");
            return false;
        };
        tracing::debug!(?viewport, ?frame, mode = ?self.mode, "geometry recomputed");
        self.geometry = next;
        self.revision = self.revision.wrapping_add(1);
        true
    }
}

/// Color-frame dimension of a side-by-side packed video: alpha in the left half, color in
/// the right half, so the visible frame is half as wide as the decoded one.
pub fn color_frame_size(video: PixelSize) -> PixelSize {
    PixelSize::new(video.width / 2, video.height)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/scale.rs"]
mod tests;
