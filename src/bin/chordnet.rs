use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context as _;
use chordnet::{
    AnimationConfig, Background, CancelToken, ChordError, ChordResult, Ease, FrameIndex,
    LogProgress, PatternTag, RenderSession, RenderSessionOpts, Rgba8, RunOpts, parse_palette,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Render a growing chord network (3 to 48 nodes) to an MP4 (requires `ffmpeg` on PATH).
///
/// Positional values override `--config`, which overrides the built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "chordnet", version, allow_negative_numbers = true)]
struct Cli {
    /// Chord color as hex (default #333366).
    line_color: Option<String>,
    /// Chord stroke width in pixels (default 1).
    line_width: Option<String>,
    /// Node disc radius in pixels (default 12).
    node_size: Option<String>,
    /// Ring radius in pixels (default 180).
    radius: Option<String>,
    /// Output MP4 path (default network_animation.mp4).
    output: Option<PathBuf>,
    /// Frames per second (default 30).
    fps: Option<String>,
    /// Duration in seconds (default 10).
    duration: Option<String>,
    /// Background hex color or `transparent` (default transparent).
    background: Option<String>,
    /// Node placement: circular, opposite or alternating (default circular).
    pattern: Option<String>,

    /// JSON config file applied before positional values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated node colors, cycled by node index.
    #[arg(long)]
    palette: Option<String>,

    /// Transition curve: linear, in_out_quad or in_out_cubic.
    #[arg(long)]
    ease: Option<String>,

    /// x264 constant rate factor (0-51).
    #[arg(long)]
    crf: Option<String>,

    /// x264 preset.
    #[arg(long)]
    preset: Option<String>,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    jobs: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Render a single frame to a PNG instead of encoding a video.
    #[arg(long, num_args = 2, value_names = ["INDEX", "PNG"])]
    still: Option<Vec<String>>,

    /// Keep a copy of the rendered PNG sequence in this directory.
    #[arg(long)]
    keep_frames: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Exit code for invalid configuration, including command-line usage errors.
const USAGE_EXIT_CODE: u8 = 1;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "chordnet=info",
        1 => "chordnet=debug",
        _ => "chordnet=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(e: &ChordError) -> u8 {
    match e {
        ChordError::Validation(_) => USAGE_EXIT_CODE,
        ChordError::Environment(_) => 2,
        ChordError::Synthesis(_) | ChordError::Other(_) => 3,
        ChordError::Encode(_) => 4,
        ChordError::Cancelled(_) => 130,
    }
}

fn execute(cli: Cli) -> ChordResult<()> {
    let config = build_config(&cli)?;
    let session_opts = RenderSessionOpts {
        parallel: cli.parallel,
        chunk_size: cli.chunk_size,
        threads: cli.jobs,
        ..RenderSessionOpts::default()
    };

    if let Some(still) = cli.still.as_deref() {
        return cmd_still(&config, session_opts, still);
    }

    let opts = RunOpts {
        session: session_opts,
        keep_frames: cli.keep_frames.clone(),
        scratch_dir: None,
    };
    let summary = chordnet::run(&config, &opts, &mut LogProgress::default(), &CancelToken::new())?;
    eprintln!(
        "wrote {} ({} frames, {}x{})",
        summary.output.display(),
        summary.frames,
        summary.canvas.width,
        summary.canvas.height
    );
    Ok(())
}

fn cmd_still(
    config: &AnimationConfig,
    opts: RenderSessionOpts,
    still: &[String],
) -> ChordResult<()> {
    let [index, out] = still else {
        return Err(ChordError::validation("--still expects INDEX and PNG"));
    };
    let index: u64 = parse_arg("still index", index)?;
    let out = PathBuf::from(out);

    let session = RenderSession::new(config, opts)?;
    let frame = session.render_frame(FrameIndex(index))?;

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame.save_png(&out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn build_config(cli: &Cli) -> ChordResult<AnimationConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => AnimationConfig::from_json_path(path)?,
        None => AnimationConfig::default(),
    };

    if let Some(v) = cli.line_color.as_deref() {
        config.line_color = parse_arg::<Rgba8>("line color", v)?;
    }
    if let Some(v) = cli.line_width.as_deref() {
        config.line_width = parse_arg("line width", v)?;
    }
    if let Some(v) = cli.node_size.as_deref() {
        config.node_size = parse_arg("node size", v)?;
    }
    if let Some(v) = cli.radius.as_deref() {
        config.radius = parse_arg("radius", v)?;
    }
    if let Some(v) = cli.output.as_ref() {
        config.output = v.clone();
    }
    if let Some(v) = cli.fps.as_deref() {
        config.fps = parse_arg("fps", v)?;
    }
    if let Some(v) = cli.duration.as_deref() {
        config.duration_secs = parse_arg("duration", v)?;
    }
    if let Some(v) = cli.background.as_deref() {
        config.background = parse_arg::<Background>("background", v)?;
    }
    if let Some(v) = cli.pattern.as_deref() {
        config.pattern = parse_arg::<PatternTag>("pattern", v)?;
    }
    if let Some(v) = cli.palette.as_deref() {
        config.palette = parse_palette(v)?;
    }
    if let Some(v) = cli.ease.as_deref() {
        config.ease = parse_arg::<Ease>("ease", v)?;
    }
    if let Some(v) = cli.crf.as_deref() {
        config.encoder.crf = parse_arg("crf", v)?;
    }
    if let Some(v) = cli.preset.as_deref() {
        config.encoder.preset = v.trim().to_ascii_lowercase();
    }

    config.validate()?;
    tracing::debug!(?config, "configuration resolved");
    Ok(config)
}

fn parse_arg<T>(name: &str, raw: &str) -> ChordResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ChordError::validation(format!("invalid {name} '{raw}': {e}")))
}
