use crate::animation::ease::Ease;
use crate::foundation::core::FrameIndex;

/// Node count of the first growth step.
pub const MIN_NODES: usize = 3;
/// Node count of the final static frame.
pub const MAX_NODES: usize = 48;
/// Number of `count -> count + 1` growth steps.
pub const GROWTH_STEPS: u64 = (MAX_NODES - MIN_NODES) as u64;

/// Which part of the animation a frame belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Transition from `count` to `count + 1` nodes.
    Growing {
        /// Node count at the start of the step.
        count: usize,
    },
    /// Trailing static frame at [`MAX_NODES`].
    Final,
}

/// Everything needed to synthesize one frame. Pure data; rendering it is deterministic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSpec {
    /// Position in the output sequence.
    pub index: FrameIndex,
    /// Phase the frame belongs to.
    pub phase: Phase,
    /// Source layout node count.
    pub from_count: usize,
    /// Target layout node count.
    pub to_count: usize,
    /// Eased transition progress in `[0, 1]`.
    pub t: f64,
}

/// Derived growth timeline for a given total frame budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    frames_per_step: u64,
    ease: Ease,
}

impl Timeline {
    /// Timeline for `total_frames = fps * duration`.
    ///
    /// `frames_per_step = floor(total_frames / 45)`; budgets under 45 frames collapse to the single
    /// final frame.
    pub fn new(total_frames: u64, ease: Ease) -> Self {
        Self {
            frames_per_step: total_frames / GROWTH_STEPS,
            ease,
        }
    }

    /// Frames emitted for every growth step.
    pub fn frames_per_step(&self) -> u64 {
        self.frames_per_step
    }

    /// Exact number of frames the timeline emits (growth frames plus the final frame).
    pub fn len(&self) -> u64 {
        GROWTH_STEPS * self.frames_per_step + 1
    }

    /// Always `false`: the final frame is emitted for every budget.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Random access to frame `idx`.
    pub fn frame_at(&self, idx: FrameIndex) -> Option<FrameSpec> {
        let growth_frames = GROWTH_STEPS * self.frames_per_step;
        if idx.0 < growth_frames {
            let step = idx.0 / self.frames_per_step;
            let sub = idx.0 % self.frames_per_step;
            let count = MIN_NODES + step as usize;
            return Some(self.growing_spec(idx, count, sub));
        }
        if idx.0 == growth_frames {
            return Some(final_spec(idx));
        }
        None
    }

    /// Iterate all frames in output order.
    pub fn iter(&self) -> TimelineIter {
        let state = if self.frames_per_step == 0 {
            SchedulerState::Final
        } else {
            SchedulerState::Growing {
                count: MIN_NODES,
                sub: 0,
            }
        };
        TimelineIter {
            timeline: *self,
            state,
            next: 0,
        }
    }

    fn growing_spec(&self, index: FrameIndex, count: usize, sub: u64) -> FrameSpec {
        let progress = sub as f64 / self.frames_per_step as f64;
        FrameSpec {
            index,
            phase: Phase::Growing { count },
            from_count: count,
            to_count: count + 1,
            t: self.ease.apply(progress),
        }
    }
}

fn final_spec(index: FrameIndex) -> FrameSpec {
    FrameSpec {
        index,
        phase: Phase::Final,
        from_count: MAX_NODES,
        to_count: MAX_NODES,
        t: 0.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SchedulerState {
    Growing { count: usize, sub: u64 },
    Final,
    Done,
}

/// Iterator driving the `Growing(3) .. Growing(47) -> Final -> Done` state machine.
#[derive(Clone, Debug)]
pub struct TimelineIter {
    timeline: Timeline,
    state: SchedulerState,
    next: u64,
}

impl Iterator for TimelineIter {
    type Item = FrameSpec;

    fn next(&mut self) -> Option<FrameSpec> {
        let index = FrameIndex(self.next);
        let spec = match self.state {
            SchedulerState::Growing { count, sub } => {
                let spec = self.timeline.growing_spec(index, count, sub);
                self.state = if sub + 1 < self.timeline.frames_per_step {
                    SchedulerState::Growing {
                        count,
                        sub: sub + 1,
                    }
                } else if count + 1 < MAX_NODES {
                    SchedulerState::Growing {
                        count: count + 1,
                        sub: 0,
                    }
                } else {
                    SchedulerState::Final
                };
                spec
            }
            SchedulerState::Final => {
                self.state = SchedulerState::Done;
                final_spec(index)
            }
            SchedulerState::Done => return None,
        };
        self.next += 1;
        Some(spec)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.timeline.len().saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimelineIter {}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scheduler.rs"]
mod tests;
