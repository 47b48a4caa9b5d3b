//! Marketclash renders animated market-cap "line race" videos.
//!
//! A run turns a few yearly values per company into a dense, jittered series, draws one
//! 1080×1920 chart frame per animation step, and encodes the frames into an MP4 with the
//! system `ffmpeg`:
//!
//! - Describe the race with a [`RaceConfig`]
//! - Create a [`RaceSession`] (validation, interpolation, frame plan)
//! - [`RaceSession::run`] a [`StepRenderer`] into a [`FrameStore`] and a [`FrameSink`]
//!
//! [`render_video`] wires the default renderer, store and sink together.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Run configuration and the built-in preset.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Chart rendering.
pub mod render;
/// Run orchestration.
pub mod session;
/// Series interpolation.
pub mod series;
/// Frame files on disk.
pub mod store;
/// Frame-to-step mapping.
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgb8};
pub use crate::foundation::error::{ClashError, ClashResult};

pub use crate::config::{EntityConfig, FontFiles, RaceConfig, RunPaths, Theme, YearRange};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::{FrameRGBA, FrameRenderer, RaceAssets, StepRenderer};
pub use crate::series::{EntitySeries, SeriesSet, interpolate};
pub use crate::session::{CancelToken, RaceSession, RunReport, render_video};
pub use crate::store::{FrameStore, write_frame_png};
pub use crate::timeline::TimelinePlan;
