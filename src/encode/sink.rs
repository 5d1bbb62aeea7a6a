use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ChordError, ChordResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Size of every frame that will be pushed.
    pub canvas: Canvas,
    /// Playback rate of the sequence.
    pub fps: u32,
    /// Exact number of frames that will be pushed.
    pub frame_count: u64,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called with indices `0, 1, 2, ...` with no gaps or repeats,
/// and `end` is called once after the last frame.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> ChordResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ChordResult<()>;
    fn end(&mut self) -> ChordResult<()>;
}

/// Checks the ordering contract on behalf of a sink.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SequenceGuard {
    expected: Option<SinkConfig>,
    next: u64,
}

impl SequenceGuard {
    pub(crate) fn begin(&mut self, cfg: SinkConfig) {
        self.expected = Some(cfg);
        self.next = 0;
    }

    pub(crate) fn accept(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ChordResult<()> {
        let cfg = self
            .expected
            .ok_or_else(|| ChordError::synthesis("frame sink not started"))?;
        if idx.0 != self.next {
            return Err(ChordError::synthesis(format!(
                "frame sink received frame {} while expecting {}",
                idx.0, self.next
            )));
        }
        if idx.0 >= cfg.frame_count {
            return Err(ChordError::synthesis(format!(
                "frame sink received frame {} beyond the announced {} frames",
                idx.0, cfg.frame_count
            )));
        }
        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(ChordError::synthesis(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        self.next += 1;
        Ok(())
    }

    pub(crate) fn finish(&mut self) -> ChordResult<u64> {
        let cfg = self
            .expected
            .take()
            .ok_or_else(|| ChordError::synthesis("frame sink not started"))?;
        if self.next != cfg.frame_count {
            return Err(ChordError::synthesis(format!(
                "frame sink ended after {} of {} frames",
                self.next, cfg.frame_count
            )));
        }
        Ok(self.next)
    }

    pub(crate) fn written(&self) -> u64 {
        self.next
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    guard: SequenceGuard,
    cfg: Option<SinkConfig>,
    /// Frames in timeline order.
    pub frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration received by the last `begin`.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ChordResult<()> {
        self.guard.begin(cfg);
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ChordResult<()> {
        self.guard.accept(idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ChordResult<()> {
        self.guard.finish()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
