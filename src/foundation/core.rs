use crate::foundation::error::{ChordError, ChordResult};

pub use kurbo::Point;

/// Absolute 0-based frame index in timeline order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Square-or-rectangular output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest edge accepted by the rasterizer.
    pub const MAX_EDGE: u32 = 8192;

    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> ChordResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChordError::validation("canvas width/height must be non-zero"));
        }
        if width > Self::MAX_EDGE || height > Self::MAX_EDGE {
            return Err(ChordError::validation(format!(
                "canvas {width}x{height} exceeds the {max}px limit",
                max = Self::MAX_EDGE
            )));
        }
        Ok(Self { width, height })
    }

    /// Square canvas whose edge is `extent` rounded up to whole pixels.
    pub fn square_from_extent(extent: f64) -> ChordResult<Self> {
        if !extent.is_finite() || extent <= 0.0 {
            return Err(ChordError::validation(format!(
                "canvas extent must be finite and positive, got {extent}"
            )));
        }
        let edge = extent.ceil();
        if edge > f64::from(Self::MAX_EDGE) {
            return Err(ChordError::validation(format!(
                "canvas extent {extent} exceeds the {max}px limit",
                max = Self::MAX_EDGE
            )));
        }
        Self::new(edge as u32, edge as u32)
    }

    /// Geometric center of the canvas.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Number of bytes in one RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
