use super::*;
use crate::encode::progress::NoProgress;
use crate::encode::sink::InMemorySink;
use crate::foundation::color::{Background, Rgba8};
use crate::timeline::scheduler::Phase;

fn small_config(fps: u32, duration_secs: u32) -> AnimationConfig {
    AnimationConfig {
        radius: 30.0,
        node_size: 4.0,
        fps,
        duration_secs,
        background: Background::Solid(Rgba8::rgb(255, 255, 255)),
        ..AnimationConfig::default()
    }
}

fn session(config: &AnimationConfig, parallel: bool) -> RenderSession {
    RenderSession::new(
        config,
        RenderSessionOpts {
            parallel,
            chunk_size: 7,
            threads: Some(3),
            channel_capacity: 2,
        },
    )
    .unwrap()
}

#[derive(Default)]
struct CountingProgress {
    calls: Vec<(u64, u64)>,
}

impl ProgressSink for CountingProgress {
    fn frames_written(&mut self, done: u64, total: u64) {
        self.calls.push((done, total));
    }
}

struct FailingSink {
    fail_at: u64,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ChordResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, _frame: &FrameRGBA) -> ChordResult<()> {
        if idx.0 == self.fail_at {
            return Err(ChordError::synthesis("disk full"));
        }
        Ok(())
    }

    fn end(&mut self) -> ChordResult<()> {
        Ok(())
    }
}

#[test]
fn first_growth_frame_draws_triangle_chords_only() {
    let s = session(&small_config(45, 1), false);
    let spec = s.timeline().frame_at(FrameIndex(0)).unwrap();
    assert_eq!(spec.phase, Phase::Growing { count: 3 });

    let scene = s.scene(&spec).unwrap();
    assert_eq!(scene.nodes.len(), 4);
    assert_eq!(scene.nodes[3].scale, Some(0.0));
    assert_eq!(scene.edges.len(), 3);
}

#[test]
fn final_frame_connects_all_48_nodes() {
    let s = session(&small_config(45, 1), false);
    let last = FrameIndex(s.timeline().len() - 1);
    let spec = s.timeline().frame_at(last).unwrap();
    assert_eq!(spec.phase, Phase::Final);

    let scene = s.scene(&spec).unwrap();
    assert_eq!(scene.nodes.len(), 48);
    assert!(scene.nodes.iter().all(|n| n.scale.is_none()));
    assert_eq!(scene.edges.len(), 48 * 24);
}

#[test]
fn render_all_delivers_every_frame_in_order() {
    let s = session(&small_config(45, 1), false);
    let mut sink = InMemorySink::new();
    let mut progress = CountingProgress::default();
    let stats = s
        .render_all(&mut sink, &mut progress, &CancelToken::new())
        .unwrap();

    assert_eq!(stats.frames_total, 46);
    assert_eq!(stats.frames_written, 46);
    let indices: Vec<u64> = sink.frames.iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, (0..46).collect::<Vec<_>>());
    assert_eq!(progress.calls.len(), 46);
    assert_eq!(progress.calls.last(), Some(&(46, 46)));
    assert_eq!(sink.config().map(|c| c.frame_count), Some(46));
}

#[test]
fn parallel_output_matches_sequential() {
    let config = small_config(90, 1);
    let mut seq = InMemorySink::new();
    let mut par = InMemorySink::new();
    session(&config, false)
        .render_all(&mut seq, &mut NoProgress, &CancelToken::new())
        .unwrap();
    session(&config, true)
        .render_all(&mut par, &mut NoProgress, &CancelToken::new())
        .unwrap();

    assert_eq!(seq.frames.len(), 91);
    assert_eq!(seq.frames, par.frames);
}

#[test]
fn short_budget_renders_only_the_final_frame() {
    let s = session(&small_config(10, 2), true);
    let mut sink = InMemorySink::new();
    s.render_all(&mut sink, &mut NoProgress, &CancelToken::new())
        .unwrap();
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0].1, s.render_frame(FrameIndex(0)).unwrap());
}

#[test]
fn render_frame_matches_streamed_frame() {
    let s = session(&small_config(45, 1), false);
    let mut sink = InMemorySink::new();
    s.render_all(&mut sink, &mut NoProgress, &CancelToken::new())
        .unwrap();
    for idx in [0u64, 17, 45] {
        assert_eq!(sink.frames[idx as usize].1, s.render_frame(FrameIndex(idx)).unwrap());
    }
}

#[test]
fn render_frame_outside_timeline_is_rejected() {
    let s = session(&small_config(45, 1), false);
    let err = s.render_frame(FrameIndex(46)).unwrap_err();
    assert!(matches!(err, ChordError::Validation(_)));
}

#[test]
fn cancelled_run_stops_before_sink_completes() {
    for parallel in [false, true] {
        let s = session(&small_config(45, 1), parallel);
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut sink = InMemorySink::new();
        let err = s
            .render_all(&mut sink, &mut NoProgress, &cancel)
            .unwrap_err();
        assert!(matches!(err, ChordError::Cancelled(_)), "{err}");
        assert!(sink.frames.is_empty());
    }
}

#[test]
fn sink_failure_is_reported_instead_of_channel_errors() {
    for parallel in [false, true] {
        let s = session(&small_config(45, 1), parallel);
        let mut sink = FailingSink { fail_at: 5 };
        let err = s
            .render_all(&mut sink, &mut NoProgress, &CancelToken::new())
            .unwrap_err();
        assert!(err.to_string().contains("disk full"), "{err}");
    }
}

#[test]
fn zero_threads_is_rejected() {
    let s = RenderSession::new(
        &small_config(45, 1),
        RenderSessionOpts {
            parallel: true,
            threads: Some(0),
            ..RenderSessionOpts::default()
        },
    )
    .unwrap();
    let err = s
        .render_all(&mut InMemorySink::new(), &mut NoProgress, &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, ChordError::Validation(_)));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let config = AnimationConfig {
        fps: 0,
        ..small_config(45, 1)
    };
    assert!(matches!(
        RenderSession::new(&config, RenderSessionOpts::default()),
        Err(ChordError::Validation(_))
    ));
}
