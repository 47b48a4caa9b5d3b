//! Run configuration.
//!
//! A [`RaceConfig`] names the entities with their raw yearly data, plus the theme, main
//! entity, playback speed, year range and output file. It can be built in code
//! ([`RaceConfig::market_clash`]) or loaded from JSON.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Fps, Rgb8};
use crate::foundation::error::{ClashError, ClashResult};

/// One company whose market cap is raced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Display name, also the lookup key for `main_key`.
    pub name: String,
    /// Raw yearly values aligned to the start of the year range.
    pub data: Vec<f64>,
    /// Logo file name, relative to the assets directory.
    pub image: String,
    /// Curve, legend and value label color.
    pub color: Rgb8,
}

/// Named colors for the fixed visual roles of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Background gradient color at the top row.
    pub gradient_start: Rgb8,
    /// Background gradient color at the bottom row.
    pub gradient_end: Rgb8,
    /// Graph panel border color.
    pub grid: Rgb8,
    /// Axis tick label and units caption color.
    pub grid_labels: Rgb8,
    /// Current-year label color.
    pub year: Rgb8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            gradient_start: Rgb8::new(230, 230, 230),
            gradient_end: Rgb8::new(240, 240, 240),
            grid: Rgb8::new(94, 94, 94),
            grid_labels: Rgb8::new(94, 94, 94),
            year: Rgb8::new(94, 94, 94),
        }
    }
}

/// Upper bound on interpolated samples per entity.
pub const MAX_SERIES_SAMPLES: usize = 1_000_000;

/// Inclusive range of whole years covered by the race.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// First year (inclusive).
    pub start: i32,
    /// Last year (inclusive).
    pub end: i32,
}

impl YearRange {
    /// Number of years in the range, counting both ends.
    pub fn count(self) -> usize {
        if self.end < self.start {
            return 0;
        }
        let n = i64::from(self.end) - i64::from(self.start) + 1;
        usize::try_from(n).unwrap_or(usize::MAX)
    }

    /// Every year in the range as `f64`, in order.
    pub fn as_f64_vec(self) -> Vec<f64> {
        (self.start..=self.end).map(f64::from).collect()
    }

    /// Range width in years.
    pub fn span(self) -> f64 {
        f64::from(self.end) - f64::from(self.start)
    }
}

/// Filesystem locations used by a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunPaths {
    /// Directory holding logos and fonts.
    pub assets_dir: PathBuf,
    /// Directory for numbered frame PNGs.
    pub temp_dir: PathBuf,
    /// Directory receiving the final video.
    pub output_dir: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            temp_dir: PathBuf::from("temp"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Font file names, relative to the assets directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontFiles {
    /// Font for labels, legend, values and the year.
    pub body: String,
    /// Font for the title.
    pub title: String,
}

impl Default for FontFiles {
    fn default() -> Self {
        Self {
            body: "font.ttf".to_string(),
            title: "DIMIS___.TTF".to_string(),
        }
    }
}

fn default_title() -> String {
    "MarketClash".to_string()
}

fn default_units_caption() -> String {
    "Market Cap (in Billions)".to_string()
}

fn default_fps() -> u32 {
    60
}

fn default_hold_secs() -> u32 {
    5
}

fn default_oversample() -> usize {
    30
}

fn default_noise_ratio() -> f64 {
    0.01
}

/// Full description of one rendered video.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Title drawn at the top of every frame.
    #[serde(default = "default_title")]
    pub title: String,
    /// Caption drawn above the value axis.
    #[serde(default = "default_units_caption")]
    pub units_caption: String,
    /// Entities in legend and draw order.
    pub entities: Vec<EntityConfig>,
    /// Frame colors.
    #[serde(default)]
    pub theme: Theme,
    /// Name of the entity that drives the year label and step count.
    pub main_key: String,
    /// Series samples advanced per frame.
    pub speed: f64,
    /// Years covered by the raw data.
    pub years: YearRange,
    /// Output video file name, placed in `paths.output_dir`.
    pub output_name: String,
    /// Output frames per second.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Length of the still pause at the end of the video.
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u32,
    /// Dense samples generated per raw year.
    #[serde(default = "default_oversample")]
    pub oversample: usize,
    /// Jitter standard deviation as a fraction of the interpolated value.
    #[serde(default = "default_noise_ratio")]
    pub noise_ratio: f64,
    /// Seed for the jitter RNG; `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Input and output directories.
    #[serde(default)]
    pub paths: RunPaths,
    /// Font file names.
    #[serde(default)]
    pub fonts: FontFiles,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::market_clash()
    }
}

impl RaceConfig {
    /// Built-in Apple vs NVIDIA race over 2000..=2024 (values in billions USD).
    pub fn market_clash() -> Self {
        Self {
            title: default_title(),
            units_caption: default_units_caption(),
            entities: vec![
                EntityConfig {
                    name: "Apple".to_string(),
                    data: vec![
                        7.71, 5.16, 7.88, 26.05, 60.79, 72.98, 174.03, 75.99, 190.98, 297.09,
                        377.51, 499.69, 500.74, 643.12, 583.61, 608.96, 860.88, 746.07, 1287.0,
                        2255.0, 2901.0, 2066.0, 2994.0, 3003.0,
                    ],
                    image: "apple.png".to_string(),
                    color: Rgb8::new(135, 135, 135),
                },
                EntityConfig {
                    name: "NVIDIA".to_string(),
                    data: vec![
                        6.44, 1.2, 2.5, 3.91, 6.25, 13.15, 18.90, 4.33, 10.36, 8.94, 8.46, 7.66,
                        9.10, 10.89, 17.73, 57.53, 117.26, 81.43, 144.00, 323.24, 735.27, 364.18,
                        1223.0, 3001.0,
                    ],
                    image: "nvidia.png".to_string(),
                    color: Rgb8::new(63, 209, 65),
                },
            ],
            theme: Theme::default(),
            main_key: "Apple".to_string(),
            speed: 0.5,
            years: YearRange {
                start: 2000,
                end: 2024,
            },
            output_name: "company_growth.mp4".to_string(),
            fps: default_fps(),
            hold_secs: default_hold_secs(),
            oversample: default_oversample(),
            noise_ratio: default_noise_ratio(),
            seed: None,
            paths: RunPaths::default(),
            fonts: FontFiles::default(),
        }
    }

    /// Parse a config from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> ClashResult<Self> {
        serde_json::from_reader(r).map_err(|e| ClashError::config(format!("parse config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ClashResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ClashError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> ClashResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClashError::config(format!("serialize config JSON: {e}")))
    }

    /// Number of whole years in the range.
    pub fn year_count(&self) -> usize {
        self.years.count()
    }

    /// Length of every interpolated series, `None` on overflow.
    pub fn sample_count(&self) -> Option<usize> {
        self.year_count().checked_mul(self.oversample)
    }

    /// Number of trailing pause frames.
    pub fn hold_frames(&self) -> u64 {
        u64::from(self.hold_secs) * u64::from(self.fps)
    }

    /// Validated output frame rate.
    pub fn fps(&self) -> ClashResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Where the final video is written.
    pub fn output_path(&self) -> PathBuf {
        self.paths.output_dir.join(&self.output_name)
    }

    /// The entity that drives the year label and step count.
    pub fn main_entity(&self) -> ClashResult<&EntityConfig> {
        self.entities
            .iter()
            .find(|e| e.name == self.main_key)
            .ok_or_else(|| {
                ClashError::config(format!("main_key '{}' names no entity", self.main_key))
            })
    }

    /// Check structural invariants before any work is done.
    pub fn validate(&self) -> ClashResult<()> {
        if self.entities.is_empty() {
            return Err(ClashError::config("at least one entity is required"));
        }
        let mut seen = HashSet::new();
        for e in &self.entities {
            if !seen.insert(e.name.as_str()) {
                return Err(ClashError::config(format!(
                    "duplicate entity name '{}'",
                    e.name
                )));
            }
        }
        self.main_entity()?;

        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ClashError::config("speed must be finite and > 0"));
        }
        if self.oversample == 0 {
            return Err(ClashError::config("oversample must be > 0"));
        }
        if !self.noise_ratio.is_finite() || self.noise_ratio < 0.0 {
            return Err(ClashError::config("noise_ratio must be finite and >= 0"));
        }
        if self.years.end <= self.years.start {
            return Err(ClashError::config("year range end must be after start"));
        }
        match self.sample_count() {
            Some(n) if n <= MAX_SERIES_SAMPLES => {}
            _ => {
                return Err(ClashError::config(format!(
                    "{} years at oversample {} exceeds {MAX_SERIES_SAMPLES} samples per series",
                    self.year_count(),
                    self.oversample
                )));
            }
        }
        if self.output_name.trim().is_empty() {
            return Err(ClashError::config("output_name must be non-empty"));
        }
        self.fps()
            .map_err(|_| ClashError::config("fps must be > 0"))?;

        let years = self.year_count();
        for e in &self.entities {
            if e.data.len() != years && e.data.len() + 1 != years {
                return Err(ClashError::config(format!(
                    "entity '{}' has {} data points; expected {} or {} for {}..={}",
                    e.name,
                    e.data.len(),
                    years - 1,
                    years,
                    self.years.start,
                    self.years.end
                )));
            }
            if e.data.iter().any(|v| !v.is_finite()) {
                return Err(ClashError::config(format!(
                    "entity '{}' has non-finite data",
                    e.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
