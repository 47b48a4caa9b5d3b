//! Fixed frame geometry and the data-to-pixel mapping.

use crate::config::YearRange;
use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::{ClashError, ClashResult};
use crate::series::SeriesSet;

/// Output frame size (portrait 1080p).
pub const FRAME: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

/// Plot area of the chart.
pub const GRAPH: GraphPanel = GraphPanel {
    left: 100,
    top: 400,
    width: 880,
    height: 1400,
};

/// Distance between grid lines, both axes.
pub const GRID_STEP: i32 = 100;
/// Horizontal distance between year tick labels.
pub const X_LABEL_STEP: i32 = 100;
/// Vertical distance between value tick labels.
pub const Y_LABEL_STEP: i32 = 200;
/// Grid line color.
pub const GRID_LINE: Rgb8 = Rgb8::new(200, 200, 200);
/// Grid line width in pixels.
pub const GRID_LINE_WIDTH: f64 = 1.0;
/// Panel border width in pixels.
pub const BORDER_WIDTH: f64 = 2.0;
/// Entity curve width in pixels.
pub const CURVE_WIDTH: f64 = 3.0;

/// Logos are scaled to this square size.
pub const LOGO_SIZE: u32 = 60;
/// Top-left of the first legend row.
pub const LEGEND_ORIGIN: (i32, i32) = (50, 100);
/// Vertical distance between legend rows.
pub const LEGEND_PITCH: i32 = 80;
/// Offset of a legend name from its logo.
pub const LEGEND_TEXT_OFFSET: (i32, i32) = (70, 15);

/// Top edge of the centered title.
pub const TITLE_Y: i32 = 20;
/// Top-left of the current-year label.
pub const YEAR_POS: (i32, i32) = (815, 295);
/// Marker logo offset from the smoothed curve head.
pub const MARKER_LOGO_OFFSET: (i32, i32) = (-30, -60);
/// Marker value label offset from the smoothed curve head.
pub const MARKER_VALUE_OFFSET: (i32, i32) = (-30, -80);
/// Points averaged to place the marker.
pub const SMOOTH_WINDOW: usize = 5;

/// Headroom applied above the largest value.
pub const AXIS_HEADROOM: f64 = 1.1;

/// Legend names and value labels.
pub const BODY_TEXT_PX: f32 = 24.75;
/// Axis tick labels and the units caption.
pub const LABEL_TEXT_PX: f32 = 27.5;
/// Current-year label.
pub const YEAR_TEXT_PX: f32 = 68.75;
/// Title.
pub const TITLE_TEXT_PX: f32 = 85.0;

/// Integer pixel coordinate.
pub type PixelPoint = (i32, i32);

/// Axis-aligned panel in integer pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphPanel {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl GraphPanel {
    /// Right edge.
    pub fn right(self) -> i32 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(self) -> i32 {
        self.top + self.height
    }

    /// X of every vertical grid line, left to right.
    pub fn vertical_lines(self) -> impl Iterator<Item = i32> {
        (0..=self.width)
            .step_by(GRID_STEP as usize)
            .map(move |i| self.left + i)
    }

    /// Y of every horizontal grid line, bottom to top.
    pub fn horizontal_lines(self) -> impl Iterator<Item = i32> {
        (0..=self.height)
            .step_by(GRID_STEP as usize)
            .map(move |i| self.bottom() - i)
    }
}

/// Shared vertical scale for every frame of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisScale {
    /// Largest value across all series.
    pub data_max: f64,
    /// `data_max` with headroom; maps to the panel top.
    pub axis_max: f64,
}

impl AxisScale {
    /// Scale from the full series (not the visible prefix), so it never changes mid-video.
    pub fn from_series(series: &SeriesSet) -> ClashResult<Self> {
        Self::from_max(series.global_max())
    }

    /// Scale from a known maximum.
    pub fn from_max(data_max: f64) -> ClashResult<Self> {
        if !data_max.is_finite() || data_max <= 0.0 {
            return Err(ClashError::validation(format!(
                "series maximum must be finite and > 0 (got {data_max})"
            )));
        }
        Ok(Self {
            data_max,
            axis_max: data_max * AXIS_HEADROOM,
        })
    }
}

/// Maps `(year, value)` to pixel coordinates inside a [`GraphPanel`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphMapper {
    panel: GraphPanel,
    years: YearRange,
    axis: AxisScale,
}

impl GraphMapper {
    /// Build a mapper; the year range must have non-zero span.
    pub fn new(panel: GraphPanel, years: YearRange, axis: AxisScale) -> ClashResult<Self> {
        if years.span() <= 0.0 {
            return Err(ClashError::validation("year range must have non-zero span"));
        }
        Ok(Self { panel, years, axis })
    }

    /// Panel being mapped into.
    pub fn panel(&self) -> GraphPanel {
        self.panel
    }

    /// Vertical scale.
    pub fn axis(&self) -> AxisScale {
        self.axis
    }

    /// Pixel position of a sample, truncated toward zero.
    pub fn to_pixel(&self, year: f64, value: f64) -> PixelPoint {
        let p = self.panel;
        let x = f64::from(p.left)
            + (year - f64::from(self.years.start)) * f64::from(p.width) / self.years.span();
        let y = f64::from(p.bottom()) - value * f64::from(p.height) / self.axis.axis_max;
        (x as i32, y as i32)
    }

    /// Year tick labels as `(x, label)`, one per [`X_LABEL_STEP`] pixels.
    pub fn x_ticks(&self) -> Vec<(i32, i64)> {
        let p = self.panel;
        (0..=p.width)
            .step_by(X_LABEL_STEP as usize)
            .map(|i| {
                let year = f64::from(self.years.start)
                    + f64::from(i) * self.years.span() / f64::from(p.width);
                (p.left + i, year as i64)
            })
            .collect()
    }

    /// Value tick labels as `(y, label)`, one per [`Y_LABEL_STEP`] pixels, bottom up.
    ///
    /// Labels are relative to the data maximum, not the headroom-extended axis.
    pub fn y_ticks(&self) -> Vec<(i32, i64)> {
        let p = self.panel;
        (0..=p.height)
            .step_by(Y_LABEL_STEP as usize)
            .map(|i| {
                let value =
                    (self.axis.axis_max / AXIS_HEADROOM) * (f64::from(i) / f64::from(p.height));
                (p.bottom() - i, value as i64)
            })
            .collect()
    }
}

/// Marker position: mean of the last `window` points, or the last point when fewer exist.
pub fn smooth_position(points: &[PixelPoint], window: usize) -> Option<PixelPoint> {
    let last = *points.last()?;
    if window == 0 || points.len() < window {
        return Some(last);
    }
    let tail = &points[points.len() - window..];
    let n = window as f64;
    let x = tail.iter().map(|p| f64::from(p.0)).sum::<f64>() / n;
    let y = tail.iter().map(|p| f64::from(p.1)).sum::<f64>() / n;
    Some((x as i32, y as i32))
}

/// Opaque top-to-bottom gradient: row `y` is `start + (end - start) * y / height` (floored).
pub fn vertical_gradient_rgba8(start: Rgb8, end: Rgb8, width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; Canvas { width, height }.rgba8_len()];
    let h = i64::from(height.max(1));
    let lerp = |a: u8, b: u8, y: i64| -> u8 {
        let a = i64::from(a);
        let b = i64::from(b);
        (a + ((b - a) * y).div_euclid(h)).clamp(0, 255) as u8
    };
    let row_len = (width as usize) * 4;
    if row_len == 0 {
        return bytes;
    }
    for (y, row) in bytes.chunks_exact_mut(row_len).enumerate() {
        let y = y as i64;
        let c = [
            lerp(start.r, end.r, y),
            lerp(start.g, end.g, y),
            lerp(start.b, end.b, y),
            255,
        ];
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }
    bytes
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
