use std::fmt;
use std::str::FromStr;

use crate::foundation::error::ChordError;

/// Easing curves mapping linear step progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// No easing.
    Linear,
    /// Quadratic ease-in/out (the growth animation's curve).
    #[default]
    InOutQuad,
    /// Cubic ease-in/out.
    InOutCubic,
}

impl Ease {
    /// Every curve, in declaration order.
    pub const ALL: [Ease; 3] = [Self::Linear, Self::InOutQuad, Self::InOutCubic];

    /// Name used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InOutQuad => "in_out_quad",
            Self::InOutCubic => "in_out_cubic",
        }
    }

    /// Apply this easing function to normalized progress `t` (clamped to `[0, 1]`).
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ease {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == name)
            .ok_or_else(|| {
                ChordError::validation(format!(
                    "unknown ease '{name}' (expected linear, in_out_quad or in_out_cubic)"
                ))
            })
    }
}

/// Symmetric quadratic ease-in/out: `2t²` below the midpoint, `1 - (2 - 2t)² / 2` above.
pub fn ease(t: f64) -> f64 {
    Ease::InOutQuad.apply(t)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
