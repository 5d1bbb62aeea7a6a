use std::f64::consts::TAU;

use crate::foundation::core::Point;
use crate::foundation::error::{ChordError, ChordResult};
use crate::layout::pattern::PatternTag;

/// Circle the nodes are placed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingGeometry {
    /// Canvas-space center of the ring.
    pub center: Point,
    /// Ring radius in pixels.
    pub radius: f64,
}

/// Ordered node positions; index `i` is node identity `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    positions: Vec<Point>,
}

impl Layout {
    /// Wrap already computed positions.
    pub fn from_positions(positions: Vec<Point>) -> Self {
        Self { positions }
    }

    /// Node positions in identity order.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// `true` when the layout has no nodes.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Place `count` nodes on `ring` following `pattern`.
///
/// Slot `k` sits at angle `k * 2π / count`, measured from the +y axis towards +x.
pub fn layout(count: usize, pattern: PatternTag, ring: RingGeometry) -> ChordResult<Layout> {
    if count == 0 {
        return Err(ChordError::validation("layout node count must be >= 1"));
    }

    let step = TAU / count as f64;
    let positions = pattern
        .slots(count)
        .into_iter()
        .map(|slot| {
            let angle = slot as f64 * step;
            Point::new(
                ring.radius * angle.sin() + ring.center.x,
                ring.radius * angle.cos() + ring.center.y,
            )
        })
        .collect();
    Ok(Layout { positions })
}

/// Precomputed layouts for every count in `min_count..=max_count`.
///
/// The timeline asks for the same two layouts for every sub-frame of a growth step, so they are
/// solved once per run and shared (read-only) with all render workers.
#[derive(Clone, Debug)]
pub struct LayoutTable {
    min_count: usize,
    layouts: Vec<Layout>,
}

impl LayoutTable {
    /// Solve layouts for `min_count..=max_count`.
    pub fn build(
        min_count: usize,
        max_count: usize,
        pattern: PatternTag,
        ring: RingGeometry,
    ) -> ChordResult<Self> {
        if min_count == 0 || min_count > max_count {
            return Err(ChordError::validation(format!(
                "invalid layout count range {min_count}..={max_count}"
            )));
        }
        let layouts = (min_count..=max_count)
            .map(|n| layout(n, pattern, ring))
            .collect::<ChordResult<Vec<_>>>()?;
        Ok(Self { min_count, layouts })
    }

    /// Layout for `count` nodes, if inside the table range.
    pub fn get(&self, count: usize) -> Option<&Layout> {
        count
            .checked_sub(self.min_count)
            .and_then(|i| self.layouts.get(i))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/ring.rs"]
mod tests;
