use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use image::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Used for color arguments that are neither a known name nor hex.
pub const FALLBACK: Color = Color::rgb(114, 137, 218);

/// Default decoration color (`#5865F2`).
pub const BLURPLE: Color = Color::rgb(88, 101, 242);

/// Default right-hand color of the gradient ring (`#00d4ff`).
pub const CYAN_ACCENT: Color = Color::rgb(0, 212, 255);

const NAMED_COLORS: &[(&str, Color)] = &[
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 200, 0)),
    ("blue", Color::rgb(0, 112, 244)),
    ("yellow", Color::rgb(255, 204, 0)),
    ("purple", Color::rgb(163, 73, 164)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("white", Color::rgb(255, 255, 255)),
    ("black", Color::rgb(0, 0, 0)),
    ("orange", Color::rgb(255, 140, 0)),
    ("pink", Color::rgb(255, 105, 180)),
    ("teal", Color::rgb(0, 128, 128)),
    ("lime", Color::rgb(50, 205, 50)),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a color name from the fixed table, `#RRGGBB` or `RRGGBB`.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim().to_lowercase();

        if let Some((_, color)) = NAMED_COLORS.iter().find(|(name, _)| *name == value) {
            return Ok(*color);
        }

        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("Unknown color '{}'", value);
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }

    /// Linear interpolation towards `other`, truncating like integer casts do.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t) as u8;
        Color::rgb(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Lenient parse used for chat arguments: empty or unrecognized input falls
/// back to `default` instead of failing the whole command.
pub fn parse_color(value: &str, default: Color) -> Color {
    if value.trim().is_empty() {
        return default;
    }
    Color::parse(value).unwrap_or(default)
}
