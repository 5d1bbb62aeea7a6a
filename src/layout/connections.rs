use crate::foundation::core::Point;

/// Line segment between two node positions, resolved for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// First endpoint.
    pub a: Point,
    /// Second endpoint.
    pub b: Point,
}

/// Index pairs produced by the chord rule for `n` nodes.
///
/// Each node `i` is joined to the next `floor(n / 2)` nodes around the ring. For even `n` the
/// diameter `(i, i + n/2)` appears twice, once from each endpoint; drawing it twice is harmless.
pub fn chord_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    let reach = n / 2;
    (0..n).flat_map(move |i| (1..=reach).map(move |step| (i, (i + step) % n)))
}

/// Chord edges for an ordered set of positions.
pub fn connections(positions: &[Point]) -> Vec<Edge> {
    chord_pairs(positions.len())
        .map(|(i, j)| Edge {
            a: positions[i],
            b: positions[j],
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/connections.rs"]
mod tests;
