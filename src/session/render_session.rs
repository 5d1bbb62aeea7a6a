use std::collections::HashMap;
use std::sync::mpsc;

use rayon::prelude::*;

use crate::animation::transition::{InterpolatedNode, interpolate, visible_count};
use crate::config::AnimationConfig;
use crate::encode::progress::ProgressSink;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ChordError, ChordResult};
use crate::layout::connections::{Edge, connections};
use crate::layout::ring::{Layout, LayoutTable};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuCompositor;
use crate::render::style::FrameStyle;
use crate::timeline::scheduler::{FrameSpec, MAX_NODES, MIN_NODES, Timeline};

const MAX_REORDER_BUFFER_BYTES: u64 = 128 * 1024 * 1024;

/// Options controlling how [`RenderSession::render_all`] schedules work.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Synthesize frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Frames handed to the pool at a time.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Bounded channel capacity between render workers and the writer thread.
    pub channel_capacity: usize,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            channel_capacity: 4,
        }
    }
}

/// Synthesized frame geometry, before rasterization.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameScene {
    /// Every node of the target layout, interpolated.
    pub nodes: Vec<InterpolatedNode>,
    /// Chords between the visible prefix of `nodes`.
    pub edges: Vec<Edge>,
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames the timeline emits.
    pub frames_total: u64,
    /// Frames accepted by the sink.
    pub frames_written: u64,
}

/// Renders the growth animation described by an [`AnimationConfig`].
///
/// Construction validates the config and solves every layout up front; afterwards each frame is a
/// pure function of its [`FrameSpec`].
pub struct RenderSession {
    canvas: Canvas,
    fps: u32,
    style: FrameStyle,
    table: LayoutTable,
    timeline: Timeline,
    opts: RenderSessionOpts,
}

impl RenderSession {
    /// Validate `config` and solve every layout.
    pub fn new(config: &AnimationConfig, opts: RenderSessionOpts) -> ChordResult<Self> {
        config.validate()?;
        let canvas = config.canvas()?;
        let table = LayoutTable::build(MIN_NODES, MAX_NODES, config.pattern, config.ring()?)?;
        // Surface rasterizer limits here rather than on the first worker.
        CpuCompositor::new(canvas, config.style())?;
        Ok(Self {
            canvas,
            fps: config.fps,
            style: config.style(),
            table,
            timeline: config.timeline(),
            opts,
        })
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frame schedule for this run.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Geometry of one frame: interpolated nodes plus chords of the visible prefix.
    pub fn scene(&self, spec: &FrameSpec) -> ChordResult<FrameScene> {
        let from = self.layout(spec.from_count)?;
        let to = self.layout(spec.to_count)?;
        let nodes = interpolate(from, to, spec.t);
        let visible = visible_count(spec.from_count, spec.to_count, spec.t).min(nodes.len());
        let prefix: Vec<_> = nodes[..visible].iter().map(|n| n.position).collect();
        Ok(FrameScene {
            edges: connections(&prefix),
            nodes,
        })
    }

    fn layout(&self, count: usize) -> ChordResult<&Layout> {
        self.table
            .get(count)
            .ok_or_else(|| ChordError::synthesis(format!("no layout for {count} nodes")))
    }

    fn synthesize(
        &self,
        compositor: &mut CpuCompositor,
        spec: &FrameSpec,
    ) -> ChordResult<FrameRGBA> {
        let scene = self.scene(spec)?;
        compositor.render(&scene.nodes, &scene.edges)
    }

    fn compositor(&self) -> ChordResult<CpuCompositor> {
        CpuCompositor::new(self.canvas, self.style.clone())
    }

    /// Render the single frame at `idx`.
    pub fn render_frame(&self, idx: FrameIndex) -> ChordResult<FrameRGBA> {
        let spec = self.timeline.frame_at(idx).ok_or_else(|| {
            ChordError::validation(format!(
                "frame {} is outside the timeline (0..{})",
                idx.0,
                self.timeline.len()
            ))
        })?;
        let mut compositor = self.compositor()?;
        self.synthesize(&mut compositor, &spec)
    }

    /// Render every timeline frame and stream it into `sink`.
    ///
    /// The sink receives frames in strictly increasing index order with no gaps. When `parallel`
    /// is enabled, out-of-order worker completion is reordered at the sink boundary (bounded
    /// channel backpressure). `cancel` is polled before each frame is synthesized and before each
    /// frame is handed to the sink.
    #[tracing::instrument(skip_all, fields(frames = self.timeline.len(), parallel = self.opts.parallel))]
    pub fn render_all(
        &self,
        sink: &mut dyn FrameSink,
        progress: &mut dyn ProgressSink,
        cancel: &CancelToken,
    ) -> ChordResult<RenderStats> {
        let total = self.timeline.len();
        let cfg = SinkConfig {
            canvas: self.canvas,
            fps: self.fps,
            frame_count: total,
        };

        let cap = self.opts.channel_capacity.max(1);
        let bytes_per_frame = (self.canvas.rgba_len() as u64).max(1);
        let max_chunk_by_mem = (MAX_REORDER_BUFFER_BYTES / bytes_per_frame).max(1);
        let chunk_size = (self.opts.chunk_size.max(1) as u64)
            .min(max_chunk_by_mem)
            .min(total);

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };

        std::thread::scope(|scope| -> ChordResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            let sink_ref: &mut dyn FrameSink = sink;
            let progress_ref: &mut dyn ProgressSink = progress;

            let writer = scope.spawn(move || -> ChordResult<WriterOutcome> {
                sink_ref.begin(cfg)?;

                let mut next = 0u64;
                let mut pending = HashMap::<u64, FrameRGBA>::new();
                while next < total {
                    if cancel.is_cancelled() {
                        return Ok(WriterOutcome::Interrupted { written: next });
                    }
                    if let Some(frame) = pending.remove(&next) {
                        sink_ref.push_frame(FrameIndex(next), &frame)?;
                        next += 1;
                        progress_ref.frames_written(next, total);
                        continue;
                    }
                    let Ok(msg) = rx.recv() else {
                        return Ok(WriterOutcome::Interrupted { written: next });
                    };
                    pending.insert(msg.idx.0, msg.frame);
                }

                sink_ref.end()?;
                Ok(WriterOutcome::Complete)
            });

            let produce_res = match pool.as_ref() {
                Some(pool) => {
                    let mut chunk_start = 0;
                    let mut res = Ok(());
                    while chunk_start < total {
                        let chunk_end = (chunk_start + chunk_size).min(total);
                        tracing::debug!(start = chunk_start, end = chunk_end, "rendering chunk");
                        res = self.render_chunk_parallel(
                            pool,
                            &tx,
                            cancel,
                            chunk_start,
                            chunk_end,
                        );
                        if res.is_err() {
                            break;
                        }
                        chunk_start = chunk_end;
                    }
                    res
                }
                None => self.render_sequential(&tx, cancel),
            };

            drop(tx);
            let writer_res = writer
                .join()
                .map_err(|_| ChordError::synthesis("frame writer thread panicked"))?;

            match (produce_res, writer_res) {
                (Ok(()), Ok(WriterOutcome::Complete)) => Ok(RenderStats {
                    frames_total: total,
                    frames_written: total,
                }),
                _ if cancel.is_cancelled() => {
                    Err(ChordError::cancelled("frame synthesis was cancelled"))
                }
                // The sink failed first; the producer only saw a closed channel.
                (_, Err(e)) => Err(e),
                (Err(e), Ok(_)) => Err(e),
                (Ok(()), Ok(WriterOutcome::Interrupted { written })) => Err(ChordError::synthesis(
                    format!("frame writer stopped after {written} of {total} frames"),
                )),
            }
        })
    }

    fn render_sequential(
        &self,
        tx: &mpsc::SyncSender<FrameMsg>,
        cancel: &CancelToken,
    ) -> ChordResult<()> {
        let mut compositor = self.compositor()?;
        for spec in self.timeline.iter() {
            check_cancel(cancel)?;
            let frame = self.synthesize(&mut compositor, &spec)?;
            tx.send(FrameMsg {
                idx: spec.index,
                frame,
            })
            .map_err(|_| ChordError::synthesis("frame writer is not accepting frames"))?;
        }
        Ok(())
    }

    fn render_chunk_parallel(
        &self,
        pool: &rayon::ThreadPool,
        tx: &mpsc::SyncSender<FrameMsg>,
        cancel: &CancelToken,
        start: u64,
        end: u64,
    ) -> ChordResult<()> {
        let tx = tx.clone();
        pool.install(|| {
            (start..end).into_par_iter().try_for_each_init(
                || self.compositor(),
                move |compositor, f| -> ChordResult<()> {
                    check_cancel(cancel)?;
                    let compositor = compositor
                        .as_mut()
                        .map_err(|e| ChordError::synthesis(e.to_string()))?;
                    let spec = self.timeline.frame_at(FrameIndex(f)).ok_or_else(|| {
                        ChordError::synthesis(format!("frame {f} is outside the timeline"))
                    })?;
                    let frame = self.synthesize(compositor, &spec)?;
                    tx.send(FrameMsg {
                        idx: spec.index,
                        frame,
                    })
                    .map_err(|_| ChordError::synthesis("frame writer is not accepting frames"))?;
                    Ok(())
                },
            )
        })
    }
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: FrameRGBA,
}

enum WriterOutcome {
    Complete,
    Interrupted { written: u64 },
}

fn check_cancel(cancel: &CancelToken) -> ChordResult<()> {
    if cancel.is_cancelled() {
        Err(ChordError::cancelled("frame synthesis was cancelled"))
    } else {
        Ok(())
    }
}

fn build_thread_pool(threads: Option<usize>) -> ChordResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ChordError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ChordError::synthesis(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
