use std::ffi::{OsStr, OsString};
use std::io::{BufRead as _, BufReader, Read as _};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::EncoderSettings;
use crate::encode::progress::{PercentTracker, ProgressSink};
use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{ChordError, ChordResult};

const CANCEL_POLL: Duration = Duration::from_millis(100);

/// One MP4 encode of a PNG image sequence.
#[derive(Clone, Debug)]
pub struct EncodeJob {
    /// `printf`-style input pattern (e.g. `/tmp/x/frame_%05d.png`), numbered from 0.
    pub input_pattern: PathBuf,
    /// Number of frames in the sequence.
    pub frame_count: u64,
    /// Input and output frame rate.
    pub fps: u32,
    /// Output MP4 path. Overwritten if present.
    pub out_path: PathBuf,
    /// x264 quality settings.
    pub settings: EncoderSettings,
}

impl EncodeJob {
    /// Full `ffmpeg` argument list for this job.
    ///
    /// Output is H.264 in yuv420p. The pad filter rounds odd canvas edges up to even, which
    /// yuv420p requires.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-y",
            "-hide_banner",
            "-loglevel",
            "error",
            "-nostats",
            "-progress",
            "pipe:1",
            "-framerate",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(self.fps.to_string().into());
        args.extend(["-start_number", "0", "-i"].map(OsString::from));
        args.push(self.input_pattern.clone().into_os_string());
        args.extend(
            [
                "-vf",
                "pad=ceil(iw/2)*2:ceil(ih/2)*2",
                "-an",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-crf",
            ]
            .map(OsString::from),
        );
        args.push(self.settings.crf.to_string().into());
        args.push("-preset".into());
        args.push(self.settings.preset.clone().into());
        args.extend(["-movflags", "+faststart"].map(OsString::from));
        args.push(self.out_path.clone().into_os_string());
        args
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Fail with [`ChordError::Environment`] when `ffmpeg` is unavailable.
pub fn ensure_ffmpeg() -> ChordResult<()> {
    if is_ffmpeg_on_path() {
        Ok(())
    } else {
        Err(ChordError::environment(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ))
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ChordResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ProgressLine {
    Frame(u64),
    End,
}

/// Parse one `key=value` line of `ffmpeg -progress` output.
pub(crate) fn parse_progress_line(line: &str) -> Option<ProgressLine> {
    let (key, value) = line.trim().split_once('=')?;
    match key.trim() {
        "frame" => value.trim().parse().ok().map(ProgressLine::Frame),
        "progress" if value.trim() == "end" => Some(ProgressLine::End),
        _ => None,
    }
}

/// Run `ffmpeg` for `job`, reporting percentages to `progress` and honoring `cancel`.
///
/// On failure or cancellation the partially written output file is removed.
#[tracing::instrument(skip_all, fields(out = %job.out_path.display(), frames = job.frame_count))]
pub fn encode(
    job: &EncodeJob,
    progress: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> ChordResult<()> {
    encode_with(OsStr::new("ffmpeg"), job, progress, cancel)
}

/// [`encode`] with an explicit encoder executable.
pub(crate) fn encode_with(
    program: &OsStr,
    job: &EncodeJob,
    progress: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> ChordResult<()> {
    if job.fps == 0 {
        return Err(ChordError::validation("fps must be non-zero"));
    }
    if job.frame_count == 0 {
        return Err(ChordError::encode("no frames to encode"));
    }
    ensure_parent_dir(&job.out_path)?;

    let mut child = Command::new(program)
        .args(job.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                ChordError::environment(format!("failed to spawn ffmpeg: {e}"))
            }
            _ => ChordError::encode(format!("failed to spawn ffmpeg: {e}")),
        })?;
    let mut partial = PartialOutputGuard(Some(job.out_path.clone()));

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ChordError::encode("failed to open ffmpeg stdout (unexpected)"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| ChordError::encode("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain: JoinHandle<std::io::Result<Vec<u8>>> = std::thread::spawn(move || {
        let mut stderr_bytes = Vec::new();
        stderr.read_to_end(&mut stderr_bytes)?;
        Ok(stderr_bytes)
    });

    let (tx, rx) = mpsc::channel::<ProgressLine>();
    let stdout_reader = std::thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            if let Some(parsed) = parse_progress_line(&line)
                && tx.send(parsed).is_err()
            {
                break;
            }
        }
    });

    let mut tracker = PercentTracker::new(job.frame_count);
    loop {
        if cancel.is_cancelled() {
            kill_quietly(&mut child);
            let _ = stdout_reader.join();
            let _ = stderr_drain.join();
            tracing::warn!("encoding cancelled");
            return Err(ChordError::cancelled("encoding was cancelled"));
        }
        match rx.recv_timeout(CANCEL_POLL) {
            Ok(ProgressLine::Frame(n)) => {
                if let Some(pct) = tracker.advance(n) {
                    progress.encode_percent(pct);
                }
            }
            Ok(ProgressLine::End) => {}
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    let status = child
        .wait()
        .map_err(|e| ChordError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
    let _ = stdout_reader.join();
    let stderr_bytes = stderr_drain
        .join()
        .map_err(|_| ChordError::encode("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| ChordError::encode(format!("ffmpeg stderr read failed: {e}")))?;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr_bytes);
        return Err(ChordError::encode(format!(
            "ffmpeg exited with status {}: {}",
            status,
            stderr.trim()
        )));
    }
    if !job.out_path.is_file() {
        return Err(ChordError::encode(format!(
            "ffmpeg reported success but '{}' was not written",
            job.out_path.display()
        )));
    }

    if let Some(pct) = tracker.complete() {
        progress.encode_percent(pct);
    }
    partial.disarm();
    tracing::info!("encoding finished");
    Ok(())
}

fn kill_quietly(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "ffmpeg already exited");
    }
    let _ = child.wait();
}

/// Removes the output file on drop unless disarmed.
struct PartialOutputGuard(Option<PathBuf>);

impl PartialOutputGuard {
    fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for PartialOutputGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed partial output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output")
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
