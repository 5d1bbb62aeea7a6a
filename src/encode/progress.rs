/// Observer for a run's progress.
///
/// Both hooks have empty defaults so implementors only override what they care about.
pub trait ProgressSink: Send {
    /// `done` of `total` frames have reached the frame sink.
    fn frames_written(&mut self, done: u64, total: u64) {
        let _ = (done, total);
    }

    /// Encoder progress in percent. Values are non-decreasing and never exceed 100.
    fn encode_percent(&mut self, percent: u8) {
        let _ = percent;
    }
}

/// Discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Reports through `tracing`: synthesis every `every` frames, encoding on each new percent.
#[derive(Clone, Copy, Debug)]
pub struct LogProgress {
    every: u64,
}

impl LogProgress {
    /// Log synthesis progress every `every` frames (at least 1).
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressSink for LogProgress {
    fn frames_written(&mut self, done: u64, total: u64) {
        if done % self.every == 0 || done == total {
            tracing::info!("rendered frame {done}/{total}");
        }
    }

    fn encode_percent(&mut self, percent: u8) {
        tracing::info!("encoding: {percent}%");
    }
}

/// Closure adapter: `FnProgress(|percent| ...)` receives encoder percentages only.
pub struct FnProgress<F>(pub F);

impl<F> ProgressSink for FnProgress<F>
where
    F: FnMut(u8) + Send,
{
    fn encode_percent(&mut self, percent: u8) {
        (self.0)(percent);
    }
}

/// Turns raw encoder frame counts into a clamped, non-decreasing percentage.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PercentTracker {
    total: u64,
    last: Option<u8>,
}

impl PercentTracker {
    pub(crate) fn new(total: u64) -> Self {
        Self { total, last: None }
    }

    /// Percentage for `done` frames, or `None` when it would not advance the last reported value.
    pub(crate) fn advance(&mut self, done: u64) -> Option<u8> {
        let pct = if self.total == 0 {
            100
        } else {
            (done.min(self.total).saturating_mul(100) / self.total) as u8
        };
        self.bump(pct)
    }

    /// Force 100% unless it was already reported.
    pub(crate) fn complete(&mut self) -> Option<u8> {
        self.bump(100)
    }

    fn bump(&mut self, pct: u8) -> Option<u8> {
        match self.last {
            Some(last) if pct <= last => None,
            _ => {
                self.last = Some(pct);
                Some(pct)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/progress.rs"]
mod tests;
