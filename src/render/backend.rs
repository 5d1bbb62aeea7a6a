use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ChordError, ChordResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// One composited frame: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` premultiplied bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data (what PNG expects).
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> ChordResult<()> {
        if self.data.len() != (self.width as usize) * (self.height as usize) * 4 {
            return Err(ChordError::synthesis(
                "frame data size mismatch with width*height*4",
            ));
        }
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}
