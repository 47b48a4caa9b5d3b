//! Frame-to-step mapping.
//!
//! Frame `n` shows series index `floor(n * speed)`. A run renders
//! `floor(series_len / speed)` frames, then holds the last one.

use crate::foundation::core::{FrameIndex, Fps};
use crate::foundation::error::{ClashError, ClashResult};

/// Series index shown by `frame`, clamped to the last sample.
pub fn step_for_frame(frame: FrameIndex, speed: f64, series_len: usize) -> usize {
    let last = series_len.saturating_sub(1);
    let raw = ((frame.0 as f64) * speed).floor();
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    (raw as usize).min(last)
}

/// Number of animated frames for a series of `series_len` samples.
pub fn total_steps(series_len: usize, speed: f64) -> u64 {
    let raw = ((series_len as f64) / speed).floor();
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw as u64
}

/// Frame budget of one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelinePlan {
    /// Animated frames, one render each.
    pub total_steps: u64,
    /// Trailing copies of the last animated frame.
    pub hold_frames: u64,
    /// Playback rate.
    pub fps: Fps,
    /// Series samples advanced per frame.
    pub speed: f64,
    /// Length of the main series.
    pub series_len: usize,
}

impl TimelinePlan {
    /// Build a plan; fails when the series would produce no frames.
    pub fn new(series_len: usize, speed: f64, hold_frames: u64, fps: Fps) -> ClashResult<Self> {
        let total_steps = total_steps(series_len, speed);
        if total_steps == 0 {
            return Err(ClashError::validation(format!(
                "series of {series_len} samples at speed {speed} yields no frames"
            )));
        }
        Ok(Self {
            total_steps,
            hold_frames,
            fps,
            speed,
            series_len,
        })
    }

    /// Series index shown by `frame`.
    pub fn step(&self, frame: FrameIndex) -> usize {
        step_for_frame(frame, self.speed, self.series_len)
    }

    /// Animated plus held frames.
    pub fn total_frames(&self) -> u64 {
        self.total_steps + self.hold_frames
    }

    /// Video length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.total_frames())
    }
}

#[cfg(test)]
#[path = "../tests/unit/timeline/timeline.rs"]
mod tests;
