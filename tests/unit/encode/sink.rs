use super::*;

fn cfg(frame_count: u64) -> SinkConfig {
    SinkConfig {
        canvas: Canvas::new(4, 2).unwrap(),
        fps: 30,
        frame_count,
    }
}

fn blank(width: u32, height: u32) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: vec![0; (width * height * 4) as usize],
    }
}

#[test]
fn in_memory_sink_collects_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(3)).unwrap();
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &blank(4, 2)).unwrap();
    }
    sink.end().unwrap();

    let indices: Vec<u64> = sink.frames.iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(sink.config(), Some(cfg(3)));
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = InMemorySink::new();
    let err = sink.push_frame(FrameIndex(0), &blank(4, 2)).unwrap_err();
    assert!(matches!(err, ChordError::Synthesis(_)));
}

#[test]
fn gaps_and_repeats_are_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(3)).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &blank(4, 2)).is_err());

    sink.push_frame(FrameIndex(0), &blank(4, 2)).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &blank(4, 2)).is_err());
}

#[test]
fn frames_beyond_announced_count_are_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(1)).unwrap();
    sink.push_frame(FrameIndex(0), &blank(4, 2)).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &blank(4, 2)).is_err());
}

#[test]
fn size_mismatch_is_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(1)).unwrap();
    let err = sink.push_frame(FrameIndex(0), &blank(2, 2)).unwrap_err();
    assert!(err.to_string().contains("size mismatch"));
}

#[test]
fn ending_early_is_an_error() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2)).unwrap();
    sink.push_frame(FrameIndex(0), &blank(4, 2)).unwrap();
    let err = sink.end().unwrap_err();
    assert!(err.to_string().contains("1 of 2"));
}

#[test]
fn begin_resets_previous_run() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(1)).unwrap();
    sink.push_frame(FrameIndex(0), &blank(4, 2)).unwrap();
    sink.end().unwrap();

    sink.begin(cfg(1)).unwrap();
    assert!(sink.frames.is_empty());
    sink.push_frame(FrameIndex(0), &blank(4, 2)).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.frames.len(), 1);
}
