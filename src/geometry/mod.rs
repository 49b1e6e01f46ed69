//! Quad geometry for placing the color frame inside the viewport.

pub mod scale;

pub use scale::{
    FrameGeometry, POSITION_OFFSET_BYTES, ScaleMode, ScalePolicy, UV_OFFSET_BYTES,
    VERTEX_STRIDE_BYTES, Vertex, color_frame_size, compute_geometry,
};
