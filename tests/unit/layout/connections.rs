use std::collections::BTreeSet;

use super::*;
use crate::layout::pattern::PatternTag;
use crate::layout::ring::{RingGeometry, layout};

fn unordered(pairs: impl Iterator<Item = (usize, usize)>) -> BTreeSet<(usize, usize)> {
    pairs.map(|(i, j)| (i.min(j), i.max(j))).collect()
}

#[test]
fn four_nodes_form_k4() {
    let pairs: Vec<_> = chord_pairs(4).collect();
    // 4 nodes * reach 2, diameters counted twice.
    assert_eq!(pairs.len(), 8);
    let set = unordered(pairs.into_iter());
    let k4: BTreeSet<_> = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        .into_iter()
        .collect();
    assert_eq!(set, k4);
}

#[test]
fn every_count_yields_a_complete_graph() {
    for n in 2..=48 {
        let set = unordered(chord_pairs(n));
        assert_eq!(set.len(), n * (n - 1) / 2, "n={n}");
        assert!(set.iter().all(|&(i, j)| i != j), "self loop for n={n}");
    }
}

#[test]
fn odd_counts_have_no_duplicates() {
    for n in (3..=47).step_by(2) {
        assert_eq!(chord_pairs(n).count(), n * (n - 1) / 2);
    }
}

#[test]
fn degenerate_inputs_yield_no_edges() {
    assert!(connections(&[]).is_empty());
    assert!(connections(&[Point::new(1.0, 1.0)]).is_empty());
}

#[test]
fn edges_resolve_layout_positions() {
    let ring = RingGeometry {
        center: Point::new(50.0, 50.0),
        radius: 40.0,
    };
    let l = layout(4, PatternTag::Circular, ring).unwrap();
    let edges = connections(l.positions());
    assert_eq!(edges.len(), 8);
    assert_eq!(edges[0].a, l.positions()[0]);
    assert_eq!(edges[0].b, l.positions()[1]);
}
