use super::*;

fn is_permutation(mut slots: Vec<usize>, count: usize) -> bool {
    slots.sort_unstable();
    slots == (0..count).collect::<Vec<_>>()
}

#[test]
fn every_pattern_is_a_bijection_for_every_count() {
    for pattern in PatternTag::ALL {
        for count in 1..=64 {
            let slots = pattern.slots(count);
            assert_eq!(slots.len(), count, "{pattern} n={count}");
            assert!(is_permutation(slots, count), "{pattern} n={count}");
        }
    }
}

#[test]
fn circular_is_identity() {
    assert_eq!(PatternTag::Circular.slots(5), vec![0, 1, 2, 3, 4]);
}

#[test]
fn opposite_interleaves_halves() {
    assert_eq!(PatternTag::Opposite.slots(3), vec![0, 1, 2]);
    assert_eq!(PatternTag::Opposite.slots(4), vec![0, 2, 1, 3]);
    assert_eq!(PatternTag::Opposite.slots(5), vec![0, 2, 1, 3, 4]);
    assert_eq!(PatternTag::Opposite.slots(8), vec![0, 4, 1, 5, 2, 6, 3, 7]);
    assert_eq!(PatternTag::Opposite.slots(9), vec![0, 4, 1, 5, 2, 6, 3, 7, 8]);
}

#[test]
fn alternating_seeds_triangle_then_alternates_ends() {
    assert_eq!(PatternTag::Alternating.slots(2), vec![0, 1]);
    assert_eq!(PatternTag::Alternating.slots(3), vec![0, 1, 2]);
    assert_eq!(PatternTag::Alternating.slots(4), vec![0, 1, 2, 3]);
    assert_eq!(PatternTag::Alternating.slots(7), vec![0, 1, 2, 3, 6, 4, 5]);
}

#[test]
fn parse_is_case_insensitive_and_strict() {
    assert_eq!("Opposite".parse::<PatternTag>().unwrap(), PatternTag::Opposite);
    assert_eq!(" alternating ".parse::<PatternTag>().unwrap(), PatternTag::Alternating);
    assert!("spiral".parse::<PatternTag>().is_err());
}

#[test]
fn serde_uses_snake_case_names() {
    assert_eq!(
        serde_json::to_value(PatternTag::Alternating).unwrap(),
        serde_json::json!("alternating")
    );
    let p: PatternTag = serde_json::from_value(serde_json::json!("opposite")).unwrap();
    assert_eq!(p, PatternTag::Opposite);
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn slots_sorted_equal_range(count in 1usize..512, which in 0usize..3) {
            let pattern = PatternTag::ALL[which];
            prop_assert!(is_permutation(pattern.slots(count), count));
        }
    }
}
