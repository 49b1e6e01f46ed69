pub mod data_source;
pub mod decoder;
pub mod ffmpeg;

pub use data_source::{DataSource, MediaEntry};
pub use decoder::{DecoderListener, MediaDecoder};
pub use ffmpeg::FfmpegDecoder;
