use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::foundation::color::{Background, DEFAULT_PALETTE, Rgba8};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ChordError, ChordResult};
use crate::layout::pattern::PatternTag;
use crate::layout::ring::RingGeometry;
use crate::render::style::FrameStyle;
use crate::timeline::scheduler::Timeline;

/// Padding between the outermost node edge and the canvas border, in pixels.
pub const CANVAS_MARGIN: f64 = 20.0;

/// x264 presets accepted by [`EncoderSettings::preset`].
pub const X264_PRESETS: [&str; 10] = [
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
    "placebo",
];

/// H.264 encoder quality knobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    /// Constant rate factor (`0..=51`, lower is higher quality).
    pub crf: u8,
    /// x264 speed/compression preset.
    pub preset: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            crf: 23,
            preset: "medium".to_owned(),
        }
    }
}

/// Complete, immutable description of one animation run.
///
/// Built once at startup (defaults, then an optional JSON file, then command-line values) and passed
/// by reference to everything downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Chord stroke color.
    pub line_color: Rgba8,
    /// Chord stroke width in pixels.
    pub line_width: f64,
    /// Node radius in pixels.
    pub node_size: f64,
    /// Ring radius in pixels.
    pub radius: f64,
    /// MP4 output path.
    pub output: PathBuf,
    /// Output frame rate.
    pub fps: u32,
    /// Animation duration in seconds.
    pub duration_secs: u32,
    /// Frame background.
    pub background: Background,
    /// Node slot-assignment pattern.
    pub pattern: PatternTag,
    /// Node colors.
    pub palette: Vec<Rgba8>,
    /// Easing applied to each growth step.
    pub ease: Ease,
    /// Encoder quality knobs.
    pub encoder: EncoderSettings,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            line_color: Rgba8::rgb(0x33, 0x33, 0x66),
            line_width: 1.0,
            node_size: 12.0,
            radius: 180.0,
            output: PathBuf::from("network_animation.mp4"),
            fps: 30,
            duration_secs: 10,
            background: Background::Transparent,
            pattern: PatternTag::Circular,
            palette: DEFAULT_PALETTE.to_vec(),
            ease: Ease::InOutQuad,
            encoder: EncoderSettings::default(),
        }
    }
}

impl AnimationConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_path(path: &Path) -> ChordResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ChordError::validation(format!("config '{}': {e}", path.display())))?;
        Ok(cfg)
    }

    /// Check every field and the derived canvas.
    pub fn validate(&self) -> ChordResult<()> {
        fn positive(name: &str, v: f64) -> ChordResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(ChordError::validation(format!(
                    "{name} must be a finite positive number, got {v}"
                )));
            }
            Ok(())
        }

        positive("line width", self.line_width)?;
        positive("node size", self.node_size)?;
        positive("radius", self.radius)?;
        if self.fps == 0 {
            return Err(ChordError::validation("fps must be > 0"));
        }
        if self.duration_secs == 0 {
            return Err(ChordError::validation("duration must be > 0 seconds"));
        }
        if self.palette.is_empty() {
            return Err(ChordError::validation(
                "palette must contain at least one color",
            ));
        }
        if self.encoder.crf > 51 {
            return Err(ChordError::validation(format!(
                "crf must be in 0..=51, got {}",
                self.encoder.crf
            )));
        }
        if !X264_PRESETS.contains(&self.encoder.preset.as_str()) {
            return Err(ChordError::validation(format!(
                "unknown x264 preset '{}'",
                self.encoder.preset
            )));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ChordError::validation("output path must be non-empty"));
        }
        self.canvas()?;
        Ok(())
    }

    /// Square canvas of edge `2 * (radius + node_size + margin)`, rounded up to whole pixels.
    pub fn canvas(&self) -> ChordResult<Canvas> {
        Canvas::square_from_extent(2.0 * (self.radius + self.node_size + CANVAS_MARGIN))
    }

    /// Ring centered on the canvas.
    pub fn ring(&self) -> ChordResult<RingGeometry> {
        Ok(RingGeometry {
            center: self.canvas()?.center(),
            radius: self.radius,
        })
    }

    /// `fps * duration`.
    pub fn total_frames(&self) -> u64 {
        u64::from(self.fps) * u64::from(self.duration_secs)
    }

    /// Growth timeline for this config.
    pub fn timeline(&self) -> Timeline {
        Timeline::new(self.total_frames(), self.ease)
    }

    /// Drawing style for the compositor.
    pub fn style(&self) -> FrameStyle {
        FrameStyle {
            background: self.background,
            line_color: self.line_color,
            line_width: self.line_width,
            node_size: self.node_size,
            palette: self.palette.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
