use crate::foundation::error::{AlphaError, AlphaResult};

pub use kurbo::Size;

/// Column-major 4x4 matrix, laid out the way `glUniformMatrix4fv` expects it.
pub type Mat4 = [f32; 16];

/// The 4x4 identity matrix.
pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Texture transform that maps `v -> 1 - v`.
///
/// Used when image rows arrive top-first (CPU uploads) while the quad's texture coordinates
/// put `v = 0` at the bottom edge.
pub const FLIP_V: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, -1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 1.0, 0.0, 1.0,
];

/// Integer pixel dimensions as reported by a decoder or a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Checked constructor for sizes that must be drawable.
    pub fn non_empty(width: u32, height: u32) -> AlphaResult<Self> {
        if width == 0 || height == 0 {
            return Err(AlphaError::validation(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// RGBA8 byte length of a tightly packed image of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Device orientation used to pick a media entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Orientation implied by a viewport: wider than tall is landscape.
    pub fn from_viewport(size: PixelSize) -> Self {
        if size.width > size.height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
