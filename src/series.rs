//! Dense, jittered per-entity time series.
//!
//! Raw yearly data is resampled onto `year_count * oversample` evenly spaced sample times
//! spanning the whole year range (both ends included), linearly interpolated, then perturbed
//! with Gaussian noise whose standard deviation is `noise_ratio` times the local value.
//!
//! The interpolation abscissae are the first `year_count - 1` years: the last year of the
//! range never carries a knot, so samples past the penultimate year hold the last knot's
//! value. When an entity carries one value per year, its final value is therefore unused.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::{MAX_SERIES_SAMPLES, RaceConfig};
use crate::foundation::error::{ClashError, ClashResult};

/// `n` evenly spaced values over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / ((n - 1) as f64);
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * (i as f64) })
                .collect()
        }
    }
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be increasing. Outside `[xp[0], xp[last]]` the nearest endpoint value is returned.
pub fn interp_linear(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return 0.0;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    // First knot strictly greater than x; guaranteed in 1..n by the bounds checks above.
    let hi = xp[..n].partition_point(|&k| k <= x);
    let lo = hi - 1;
    let t = (x - xp[lo]) / (xp[hi] - xp[lo]);
    fp[lo] + (fp[hi] - fp[lo]) * t
}

/// Dense series for one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySeries {
    /// Entity name.
    pub name: String,
    /// Sample times in fractional years.
    pub years: Vec<f64>,
    /// Jittered values, one per sample time.
    pub values: Vec<f64>,
}

impl EntitySeries {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return `true` when the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample time at `i`, clamped to the last sample.
    pub fn year_at(&self, i: usize) -> f64 {
        self.years
            .get(i.min(self.years.len().saturating_sub(1)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Value at `i`, clamped to the last sample.
    pub fn value_at(&self, i: usize) -> f64 {
        self.values
            .get(i.min(self.values.len().saturating_sub(1)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Largest value over the whole series (`-inf` when empty).
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Series for every entity, in configuration order.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSet {
    entities: Vec<EntitySeries>,
    main: usize,
}

impl SeriesSet {
    /// Build a set from precomputed series; `main_key` must name one of them.
    pub fn new(entities: Vec<EntitySeries>, main_key: &str) -> ClashResult<Self> {
        let main = entities
            .iter()
            .position(|e| e.name == main_key)
            .ok_or_else(|| {
                ClashError::validation(format!("main entity '{main_key}' has no series"))
            })?;
        let len = entities[main].len();
        if entities.iter().any(|e| e.len() != len || e.years.len() != len) {
            return Err(ClashError::validation(
                "all entity series must share the same sampling",
            ));
        }
        Ok(Self { entities, main })
    }

    /// All series in draw order.
    pub fn entities(&self) -> &[EntitySeries] {
        &self.entities
    }

    /// The series that drives the year label and step count.
    pub fn main(&self) -> &EntitySeries {
        &self.entities[self.main]
    }

    /// Look up a series by entity name.
    pub fn get(&self, name: &str) -> Option<&EntitySeries> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Largest value across every series.
    pub fn global_max(&self) -> f64 {
        self.entities
            .iter()
            .map(EntitySeries::max_value)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Interpolate and jitter every entity of `cfg`.
#[tracing::instrument(skip(cfg, rng), fields(entities = cfg.entities.len()))]
pub fn interpolate<R: Rng + ?Sized>(cfg: &RaceConfig, rng: &mut R) -> ClashResult<SeriesSet> {
    let year_count = cfg.year_count();
    if year_count < 2 {
        return Err(ClashError::validation("year range must cover at least two years"));
    }
    let sample_count = cfg
        .sample_count()
        .filter(|&n| n <= MAX_SERIES_SAMPLES)
        .ok_or_else(|| {
            ClashError::config(format!(
                "year count times oversample must not exceed {MAX_SERIES_SAMPLES}"
            ))
        })?;
    let samples = linspace(
        f64::from(cfg.years.start),
        f64::from(cfg.years.end),
        sample_count,
    );
    let knots = &cfg.years.as_f64_vec()[..year_count - 1];

    let mut entities = Vec::with_capacity(cfg.entities.len());
    for e in &cfg.entities {
        if e.data.len() < knots.len() {
            return Err(ClashError::validation(format!(
                "entity '{}' has {} data points, need at least {}",
                e.name,
                e.data.len(),
                knots.len()
            )));
        }
        let fp = &e.data[..knots.len()];
        let mut values = Vec::with_capacity(samples.len());
        for &t in &samples {
            let v = interp_linear(t, knots, fp);
            values.push(v + gaussian_jitter(rng, cfg.noise_ratio * v.abs())?);
        }
        entities.push(EntitySeries {
            name: e.name.clone(),
            years: samples.clone(),
            values,
        });
    }

    tracing::debug!(samples = samples.len(), "interpolated series");
    SeriesSet::new(entities, &cfg.main_key)
}

fn gaussian_jitter<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> ClashResult<f64> {
    if std_dev == 0.0 {
        return Ok(0.0);
    }
    let normal = Normal::new(0.0, std_dev)
        .map_err(|e| ClashError::validation(format!("invalid noise std dev {std_dev}: {e}")))?;
    Ok(normal.sample(rng))
}

#[cfg(test)]
#[path = "../tests/unit/series/series.rs"]
mod tests;
