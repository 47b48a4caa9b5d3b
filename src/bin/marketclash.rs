use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use marketclash::encode::ensure_parent_dir;
use marketclash::{CancelToken, RaceConfig, RaceSession, StepRenderer as _};

#[derive(Parser, Debug)]
#[command(name = "marketclash", version, about = "Render market-cap line race videos")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single animation step as a PNG.
    Frame(FrameArgs),
    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Race config JSON; the built-in Apple vs NVIDIA race when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding logos and fonts.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Directory for temporary frame files.
    #[arg(long)]
    temp: Option<PathBuf>,

    /// Directory for the finished video.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Seed for the series jitter.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    run: ConfigArgs,

    /// Output video file name, placed in the output directory.
    #[arg(long)]
    out: Option<String>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    run: ConfigArgs,

    /// Animation step (series index) to draw.
    #[arg(long)]
    step: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<RaceConfig> {
    let mut cfg = match &args.config {
        Some(path) => RaceConfig::from_path(path)?,
        None => RaceConfig::market_clash(),
    };
    if let Some(dir) = &args.assets {
        cfg.paths.assets_dir = dir.clone();
    }
    if let Some(dir) = &args.temp {
        cfg.paths.temp_dir = dir.clone();
    }
    if let Some(dir) = &args.out_dir {
        cfg.paths.output_dir = dir.clone();
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.run)?;
    if let Some(name) = args.out {
        cfg.output_name = name;
    }

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        tracing::warn!("interrupt received, stopping after the current frame");
        handler_token.cancel();
    })
    .context("install Ctrl-C handler")?;

    let report = marketclash::render_video(cfg, &cancel)?;
    eprintln!(
        "wrote {} ({} frames, {} rendered)",
        report.output.display(),
        report.frames_encoded,
        report.steps_rendered
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.run)?;
    let session = RaceSession::new(cfg, None)?;
    let mut renderer = session.renderer()?;
    let frame = renderer.render_step(args.step)?;

    ensure_parent_dir(&args.out)?;
    marketclash::write_frame_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    cfg.validate()?;
    println!("{}", cfg.to_json_pretty()?);
    Ok(())
}
