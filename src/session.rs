//! Run orchestration: interpolate, render every step, hold, encode, clean up.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::config::RaceConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::files::encode_frame_files;
use crate::encode::sink::FrameSink;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ClashError, ClashResult};
use crate::render::assets::RaceAssets;
use crate::render::frame::{FrameRenderer, StepRenderer};
use crate::series::{SeriesSet, interpolate};
use crate::store::FrameStore;
use crate::timeline::TimelinePlan;

/// Cooperative stop signal, checked once per rendered frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop. Safe to call from a signal handler thread.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Frames rendered, one per animation step.
    pub steps_rendered: u64,
    /// Frames pushed to the encoder, pause included.
    pub frames_encoded: u64,
    /// Frame files deleted after encoding.
    pub files_removed: usize,
    /// The video written.
    pub output: PathBuf,
}

/// A validated run: config, interpolated series and frame plan.
#[derive(Clone, Debug)]
pub struct RaceSession {
    config: RaceConfig,
    series: SeriesSet,
    plan: TimelinePlan,
}

impl RaceSession {
    /// Validate `config` and interpolate its series.
    ///
    /// `seed` overrides `config.seed`; with neither, the jitter is seeded from the OS.
    #[tracing::instrument(skip(config), fields(entities = config.entities.len()))]
    pub fn new(config: RaceConfig, seed: Option<u64>) -> ClashResult<Self> {
        config.validate()?;
        let mut rng = match seed.or(config.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let series = interpolate(&config, &mut rng)?;
        let plan = TimelinePlan::new(
            series.main().len(),
            config.speed,
            config.hold_frames(),
            config.fps()?,
        )?;
        Ok(Self {
            config,
            series,
            plan,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Interpolated series, main entity included.
    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    /// Frame budget of the run.
    pub fn plan(&self) -> &TimelinePlan {
        &self.plan
    }

    /// Load assets and build the chart renderer for this session.
    pub fn renderer(&self) -> ClashResult<FrameRenderer> {
        let assets = RaceAssets::load(&self.config)?;
        FrameRenderer::new(&self.config, self.series.clone(), assets)
    }

    /// Render every step into `store`, hold the last frame, encode through `sink` and remove
    /// the frame files.
    ///
    /// Frame files are removed on every exit path. Cancellation yields
    /// [`ClashError::Cancelled`].
    #[tracing::instrument(skip_all, fields(steps = self.plan.total_steps, hold = self.plan.hold_frames))]
    pub fn run(
        &self,
        renderer: &mut dyn StepRenderer,
        store: &mut FrameStore,
        sink: &mut dyn FrameSink,
        cancel: &CancelToken,
    ) -> ClashResult<RunReport> {
        tracing::info!(
            frames = self.plan.total_frames(),
            duration_secs = self.plan.duration_secs(),
            frames_dir = %store.dir().display(),
            output = %self.config.output_path().display(),
            "render started"
        );

        let outcome = self.render_and_encode(renderer, store, sink, cancel);
        let removed = store.cleanup();

        let (steps_rendered, frames_encoded) = match outcome {
            Ok(counts) => counts,
            Err(err) => {
                if let Err(cleanup_err) = removed {
                    tracing::warn!(error = %cleanup_err, "frame cleanup failed");
                }
                if err.is_cancelled() {
                    tracing::info!("render cancelled, frames removed");
                }
                return Err(err);
            }
        };
        let files_removed = removed?;

        let report = RunReport {
            steps_rendered,
            frames_encoded,
            files_removed,
            output: self.config.output_path(),
        };
        tracing::info!(
            steps = report.steps_rendered,
            frames = report.frames_encoded,
            output = %report.output.display(),
            "render finished"
        );
        Ok(report)
    }

    fn render_and_encode(
        &self,
        renderer: &mut dyn StepRenderer,
        store: &mut FrameStore,
        sink: &mut dyn FrameSink,
        cancel: &CancelToken,
    ) -> ClashResult<(u64, u64)> {
        let log_every = u64::from(self.plan.fps.num.max(1));
        for n in 0..self.plan.total_steps {
            if cancel.is_cancelled() {
                return Err(ClashError::Cancelled { frames: n });
            }
            let step = self.plan.step(FrameIndex(n));
            let frame = renderer.render_step(step)?;
            store.persist(&frame)?;
            if n % log_every == 0 {
                tracing::debug!(frame = n, step, "frame rendered");
            }
        }
        if cancel.is_cancelled() {
            return Err(ClashError::Cancelled {
                frames: self.plan.total_steps,
            });
        }

        store.hold_last(self.plan.hold_frames)?;
        let encoded = encode_frame_files(
            store.frames(),
            renderer.canvas(),
            self.plan.fps,
            sink,
        )?;
        Ok((self.plan.total_steps, encoded))
    }
}

/// Render `config` to its MP4 output with the default renderer, store and `ffmpeg` sink.
#[tracing::instrument(skip_all, fields(output = %config.output_path().display()))]
pub fn render_video(config: RaceConfig, cancel: &CancelToken) -> ClashResult<RunReport> {
    let session = RaceSession::new(config, None)?;
    let mut renderer = session.renderer()?;
    let mut store = FrameStore::create(&session.config().paths.temp_dir)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(session.config().output_path()));
    session.run(&mut renderer, &mut store, &mut sink, cancel)
}

#[cfg(test)]
#[path = "../tests/unit/session/session.rs"]
mod tests;
