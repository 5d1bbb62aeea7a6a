use std::path::PathBuf;

use crate::config::AnimationConfig;
use crate::encode::ffmpeg::{EncodeJob, encode, ensure_ffmpeg};
use crate::encode::frame_store::FrameStore;
use crate::encode::progress::ProgressSink;
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::Canvas;
use crate::foundation::error::ChordResult;
use crate::session::render_session::{RenderSession, RenderSessionOpts};

/// Options for a full render-and-encode run.
#[derive(Clone, Debug, Default)]
pub struct RunOpts {
    /// Frame scheduling.
    pub session: RenderSessionOpts,
    /// Copy the PNG sequence here before it is discarded.
    pub keep_frames: Option<PathBuf>,
    /// Parent of the temporary frame directory. `None` uses the system temp dir.
    pub scratch_dir: Option<PathBuf>,
}

/// Outcome of a successful [`run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames encoded.
    pub frames: u64,
    /// Frames per growth step.
    pub frames_per_step: u64,
    /// Rendered canvas size (before even-dimension padding).
    pub canvas: Canvas,
    /// Written MP4.
    pub output: PathBuf,
}

/// Render the animation described by `config` and encode it to `config.output`.
///
/// Stages run strictly in order: config validation, `ffmpeg` discovery, frame synthesis into a
/// temporary PNG sequence, encoding. The temporary sequence is removed whatever the outcome.
#[tracing::instrument(skip_all, fields(output = %config.output.display()))]
pub fn run(
    config: &AnimationConfig,
    opts: &RunOpts,
    progress: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> ChordResult<RunSummary> {
    let session = RenderSession::new(config, opts.session.clone())?;
    ensure_ffmpeg()?;

    let timeline = session.timeline();
    tracing::info!(
        frames = timeline.len(),
        frames_per_step = timeline.frames_per_step(),
        width = session.canvas().width,
        height = session.canvas().height,
        "starting run"
    );

    let mut store = match opts.scratch_dir.as_deref() {
        Some(parent) => FrameStore::new_in(parent)?,
        None => FrameStore::new()?,
    };
    let res = render_and_encode(config, opts, &session, &mut store, progress, cancel);
    store.close();
    let frames = res?;

    tracing::info!(frames, output = %config.output.display(), "video written");
    Ok(RunSummary {
        frames,
        frames_per_step: timeline.frames_per_step(),
        canvas: session.canvas(),
        output: config.output.clone(),
    })
}

fn render_and_encode(
    config: &AnimationConfig,
    opts: &RunOpts,
    session: &RenderSession,
    store: &mut FrameStore,
    progress: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> ChordResult<u64> {
    let stats = session.render_all(store, progress, cancel)?;
    if let Some(dest) = opts.keep_frames.as_deref() {
        store.keep_copy(dest)?;
    }

    let job = EncodeJob {
        input_pattern: store.input_pattern(),
        frame_count: stats.frames_written,
        fps: config.fps,
        out_path: config.output.clone(),
        settings: config.encoder.clone(),
    };
    encode(&job, progress, cancel)?;
    Ok(stats.frames_written)
}
