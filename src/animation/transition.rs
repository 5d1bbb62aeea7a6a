use crate::foundation::core::Point;
use crate::foundation::math::lerp;
use crate::layout::ring::Layout;

/// A node position for one frame of a growth transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolatedNode {
    /// Canvas-space position.
    pub position: Point,
    /// Fade-in factor for nodes that only exist in the target layout.
    ///
    /// Drives both radius and opacity. `None` means fully visible.
    pub scale: Option<f64>,
}

impl InterpolatedNode {
    /// Effective scale (`1.0` when absent).
    pub fn effective_scale(&self) -> f64 {
        self.scale.unwrap_or(1.0)
    }
}

/// Blend `from` towards `to` at progress `t`.
///
/// Nodes present in both layouts move linearly. Nodes only in `to` stay at their target position
/// and carry `scale = t`. Shrinking is never requested by the timeline; when it happens the result
/// is truncated to `to.len()`.
pub fn interpolate(from: &Layout, to: &Layout, t: f64) -> Vec<InterpolatedNode> {
    let shared = from.len().min(to.len());
    let mut out = Vec::with_capacity(to.len());

    out.extend(
        from.positions()
            .iter()
            .zip(to.positions())
            .take(shared)
            .map(|(a, b)| InterpolatedNode {
                position: Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t)),
                scale: None,
            }),
    );

    out.extend(
        to.positions()
            .iter()
            .skip(shared)
            .map(|&position| InterpolatedNode {
                position,
                scale: Some(t),
            }),
    );

    out
}

/// Number of leading nodes whose chords are drawn at progress `t`.
///
/// `floor(from + (to - from) * t)`, clamped to `0..=max(from, to)`.
pub fn visible_count(from_count: usize, to_count: usize, t: f64) -> usize {
    let from = from_count as f64;
    let to = to_count as f64;
    let v = (from + (to - from) * t).floor();
    if v.is_nan() || v <= 0.0 {
        return 0;
    }
    (v as usize).min(from_count.max(to_count))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
