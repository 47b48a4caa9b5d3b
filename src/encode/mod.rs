//! Video encoding sinks.
//!
//! Sinks consume frames in strictly increasing index order. [`files::encode_frame_files`]
//! replays a [`crate::store::FrameStore`] order into any sink.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Streaming stored PNG frames into a sink.
pub mod files;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use files::encode_frame_files;
pub use sink::{FrameSink, InMemorySink, SinkConfig};
