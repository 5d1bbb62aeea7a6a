use crate::foundation::color::{Background, DEFAULT_PALETTE, Rgba8};

/// Immutable drawing parameters shared by every frame of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStyle {
    /// Background fill.
    pub background: Background,
    /// Chord stroke color (drawn fully opaque).
    pub line_color: Rgba8,
    /// Chord stroke width in pixels.
    pub line_width: f64,
    /// Full-scale node radius in pixels.
    pub node_size: f64,
    /// Node colors; node `i` uses `palette[i % palette.len()]`.
    pub palette: Vec<Rgba8>,
}

impl FrameStyle {
    /// Fill color for node `index`.
    pub fn node_color(&self, index: usize) -> Rgba8 {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
        }
        self.palette[index % self.palette.len()]
    }
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            background: Background::Transparent,
            line_color: Rgba8::rgb(0x33, 0x33, 0x66),
            line_width: 1.0,
            node_size: 12.0,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}
