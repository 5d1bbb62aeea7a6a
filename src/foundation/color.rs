use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::ChordError;

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional, case-insensitive).
    pub fn parse_hex(s: &str) -> Result<Self, ChordError> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        fn hex_byte(pair: &str) -> Result<u8, ChordError> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| ChordError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !hex.is_ascii() {
            return Err(ChordError::validation(format!(
                "invalid hex color \"{trimmed}\""
            )));
        }

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, ch) in out.iter_mut().zip(hex.chars()) {
                    let nibble = ch.to_digit(16).ok_or_else(|| {
                        ChordError::validation(format!("invalid hex color \"{trimmed}\""))
                    })? as u8;
                    *slot = nibble * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Ok(Self::rgb(
                hex_byte(&hex[0..2])?,
                hex_byte(&hex[2..4])?,
                hex_byte(&hex[4..6])?,
            )),
            8 => Ok(Self {
                r: hex_byte(&hex[0..2])?,
                g: hex_byte(&hex[2..4])?,
                b: hex_byte(&hex[4..6])?,
                a: hex_byte(&hex[6..8])?,
            }),
            _ => Err(ChordError::validation(format!(
                "hex color \"{trimmed}\" must be #RGB, #RRGGBB or #RRGGBBAA"
            ))),
        }
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl FromStr for Rgba8 {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = ChordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_string()
    }
}

/// Frame background: either fully transparent or a solid fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    /// Leave every pixel at transparent black before drawing.
    #[default]
    Transparent,
    /// Fill the whole frame with this color.
    Solid(Rgba8),
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transparent => f.write_str("transparent"),
            Self::Solid(c) => c.fmt(f),
        }
    }
}

impl FromStr for Background {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        Rgba8::parse_hex(s).map(Self::Solid)
    }
}

impl TryFrom<String> for Background {
    type Error = ChordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Background> for String {
    fn from(value: Background) -> Self {
        value.to_string()
    }
}

/// Node fill colors, assigned by `palette[index % len]`.
pub const DEFAULT_PALETTE: [Rgba8; 7] = [
    Rgba8::rgb(0x3a, 0x72, 0x5e), // green
    Rgba8::rgb(0x37, 0x5d, 0x8f), // blue
    Rgba8::rgb(0x89, 0xc4, 0xf4), // light blue
    Rgba8::rgb(0xb8, 0x4c, 0x38), // red
    Rgba8::rgb(0xe6, 0x96, 0x4e), // orange
    Rgba8::rgb(0x8b, 0x5e, 0x3c), // brown
    Rgba8::rgb(0xf1, 0xa9, 0x9b), // pink
];

/// Parse a comma-separated list of hex colors (`"#fff,#000000"`).
pub fn parse_palette(list: &str) -> Result<Vec<Rgba8>, ChordError> {
    let colors = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Rgba8::parse_hex)
        .collect::<Result<Vec<_>, _>>()?;
    if colors.is_empty() {
        return Err(ChordError::validation("palette must contain at least one color"));
    }
    Ok(colors)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
