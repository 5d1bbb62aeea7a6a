use super::*;

#[test]
fn percent_is_clamped_and_monotonic() {
    let mut p = PercentTracker::new(200);
    assert_eq!(p.advance(0), Some(0));
    assert_eq!(p.advance(0), None);
    assert_eq!(p.advance(50), Some(25));
    assert_eq!(p.advance(40), None);
    assert_eq!(p.advance(51), None);
    assert_eq!(p.advance(1000), Some(100));
    assert_eq!(p.complete(), None);
}

#[test]
fn complete_reports_hundred_once() {
    let mut p = PercentTracker::new(10);
    assert_eq!(p.advance(3), Some(30));
    assert_eq!(p.complete(), Some(100));
    assert_eq!(p.complete(), None);
}

#[test]
fn zero_total_is_immediately_done() {
    let mut p = PercentTracker::new(0);
    assert_eq!(p.advance(0), Some(100));
}

#[test]
fn closure_adapter_receives_encode_percentages() {
    let mut seen = Vec::new();
    {
        let mut sink = FnProgress(|p: u8| seen.push(p));
        sink.frames_written(1, 2);
        sink.encode_percent(10);
        sink.encode_percent(100);
    }
    assert_eq!(seen, vec![10, 100]);
}

#[test]
fn log_progress_never_uses_zero_interval() {
    let mut sink = LogProgress::new(0);
    sink.frames_written(1, 1);
    sink.encode_percent(5);
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reported_values_never_decrease(total in 0u64..10_000, steps in proptest::collection::vec(0u64..20_000, 0..64)) {
            let mut p = PercentTracker::new(total);
            let mut last = None::<u8>;
            for done in steps {
                if let Some(pct) = p.advance(done) {
                    prop_assert!(pct <= 100);
                    if let Some(prev) = last {
                        prop_assert!(pct > prev);
                    }
                    last = Some(pct);
                }
            }
        }
    }
}
