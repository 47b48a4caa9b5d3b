//! Shared value types, error taxonomy and pixel helpers.

/// Core value types (frames, fps, canvas, colors).
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
