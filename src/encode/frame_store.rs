use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SequenceGuard, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ChordError, ChordResult};
use crate::render::backend::FrameRGBA;

/// `printf`-style pattern of the image sequence, as `ffmpeg -i` expects it.
pub const FRAME_PATTERN: &str = "frame_%05d.png";

/// File name of frame `idx` inside a [`FrameStore`] (`frame_00000.png`, `frame_00001.png`, ...).
pub fn frame_file_name(idx: FrameIndex) -> String {
    format!("frame_{:05}.png", idx.0)
}

/// Scratch directory holding the rendered PNG sequence for one run.
///
/// The directory is private to the run and removed when the store is closed or dropped.
#[derive(Debug)]
pub struct FrameStore {
    dir: tempfile::TempDir,
    guard: SequenceGuard,
}

impl FrameStore {
    /// Create a store under the system temporary directory.
    pub fn new() -> ChordResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("chordnet-frames-")
            .tempdir()
            .context("create temporary frame directory")
            .map_err(|e| ChordError::synthesis(format!("{e:#}")))?;
        Ok(Self::from_dir(dir))
    }

    /// Create a store under `parent`.
    pub fn new_in(parent: &Path) -> ChordResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("chordnet-frames-")
            .tempdir_in(parent)
            .with_context(|| format!("create frame directory in '{}'", parent.display()))
            .map_err(|e| ChordError::synthesis(format!("{e:#}")))?;
        Ok(Self::from_dir(dir))
    }

    fn from_dir(dir: tempfile::TempDir) -> Self {
        tracing::debug!(dir = %dir.path().display(), "frame store created");
        Self {
            dir,
            guard: SequenceGuard::default(),
        }
    }

    /// Directory holding the frames.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.path().join(frame_file_name(idx))
    }

    /// Input pattern to hand to the encoder.
    pub fn input_pattern(&self) -> PathBuf {
        self.dir.path().join(FRAME_PATTERN)
    }

    /// Number of frames written so far.
    pub fn len(&self) -> u64 {
        self.guard.written()
    }

    /// Whether no frame has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy every written frame into `dest` (created if missing). Returns the number copied.
    pub fn keep_copy(&self, dest: &Path) -> ChordResult<u64> {
        std::fs::create_dir_all(dest)
            .with_context(|| format!("create frame export directory '{}'", dest.display()))?;
        for i in 0..self.len() {
            let name = frame_file_name(FrameIndex(i));
            let from = self.dir.path().join(&name);
            let to = dest.join(&name);
            std::fs::copy(&from, &to)
                .with_context(|| format!("copy '{}' to '{}'", from.display(), to.display()))?;
        }
        tracing::info!(frames = self.len(), dest = %dest.display(), "kept frame sequence");
        Ok(self.len())
    }

    /// Remove the directory. Failures are logged and otherwise ignored.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(dir = %path.display(), error = %e, "failed to remove frame directory");
        }
    }
}

impl FrameSink for FrameStore {
    fn begin(&mut self, cfg: SinkConfig) -> ChordResult<()> {
        if self.len() > 0 {
            return Err(ChordError::synthesis("frame store already holds a sequence"));
        }
        self.guard.begin(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ChordResult<()> {
        let mut guard = self.guard;
        guard.accept(idx, frame)?;
        frame
            .save_png(&self.frame_path(idx))
            .map_err(|e| ChordError::synthesis(format!("frame {}: {e:#}", idx.0)))?;
        self.guard = guard;
        Ok(())
    }

    fn end(&mut self) -> ChordResult<()> {
        let written = self.guard.finish()?;
        tracing::debug!(frames = written, "frame sequence complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/frame_store.rs"]
mod tests;
