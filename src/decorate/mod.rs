pub mod glow;
pub mod overlay;
pub mod profile;
pub mod ring;
pub mod sticker;

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use anyhow::{Context, Result};
use image::{DynamicImage, RgbaImage};

use crate::color::Color;
use crate::config::Config;
use crate::imaging::{circular_crop, ensure_rgba, fit_square};

pub use sticker::StickerKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    Ring { color: Color },
    GradientRing { from: Color, to: Color },
    Glow { color: Color },
    Sticker(StickerKind),
    Profile,
    DoubleRing { color: Color },
    DottedRing { color: Color, count: u32 },
    Overlay { file: String, scale: f32 },
}

impl Decoration {
    pub fn name(&self) -> &'static str {
        match self {
            Decoration::Ring { .. } => "ring",
            Decoration::GradientRing { .. } => "gradient",
            Decoration::Glow { .. } => "glow",
            Decoration::Sticker(_) => "sticker",
            Decoration::Profile => "profile",
            Decoration::DoubleRing { .. } => "double",
            Decoration::DottedRing { .. } => "dotted",
            Decoration::Overlay { .. } => "overlay",
        }
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoration::Ring { color }
            | Decoration::Glow { color }
            | Decoration::DoubleRing { color } => write!(f, "{} {}", self.name(), color),
            Decoration::GradientRing { from, to } => write!(f, "gradient {} {}", from, to),
            Decoration::Sticker(kind) => write!(f, "sticker {:?}", kind),
            Decoration::Profile => write!(f, "profile"),
            Decoration::DottedRing { color, count } => write!(f, "dotted {} {}", color, count),
            Decoration::Overlay { file, scale } => write!(f, "overlay {} {}", file, scale),
        }
    }
}

/// Render settings shared by every request.
pub struct Decorator {
    pub avatar_size: u32,
    pub glow_radius: u32,
    pub captions: Vec<String>,
    pub font: Option<FontArc>,
    pub overlays_dir: PathBuf,
}

impl Default for Decorator {
    fn default() -> Self {
        let config = Config::default();
        Self {
            avatar_size: config.render.avatar_size,
            glow_radius: config.render.glow_radius,
            captions: config.profile.captions,
            font: None,
            overlays_dir: config.render.overlays_dir,
        }
    }
}

impl Decorator {
    pub fn from_config(config: &Config, config_dir: &Path) -> Result<Self> {
        let font = match config.render.resolve_font(config_dir) {
            Some(path) => Some(load_font(&path)?),
            None => {
                tracing::warn!("No font found; profile cards will be drawn without text");
                None
            }
        };

        Ok(Self {
            avatar_size: config.render.avatar_size,
            glow_radius: config.render.glow_radius,
            captions: config.profile.captions.clone(),
            font,
            overlays_dir: config.render.resolve_overlays_dir(config_dir),
        })
    }

    /// Applies `decoration` to `image`. `display_name` is only used by the
    /// profile card.
    pub fn apply(
        &self,
        decoration: &Decoration,
        image: DynamicImage,
        display_name: &str,
    ) -> Result<RgbaImage> {
        let source = ensure_rgba(image);

        match decoration {
            Decoration::Profile => profile::compose_profile_preview(
                &source,
                display_name,
                &self.captions,
                self.font.as_ref(),
            ),
            Decoration::Overlay { file, scale } => {
                let frame = overlay::load_overlay(&self.overlays_dir, file)?;
                overlay::compose_with_overlay(&source, &frame, *scale)
            }
            Decoration::Ring { color } => Ok(ring::ring(&self.avatar(&source)?, *color)),
            Decoration::GradientRing { from, to } => {
                Ok(ring::gradient_ring(&self.avatar(&source)?, *from, *to))
            }
            Decoration::Glow { color } => {
                Ok(glow::glow(&self.avatar(&source)?, *color, self.glow_radius))
            }
            Decoration::Sticker(kind) => Ok(sticker::add_sticker(&self.avatar(&source)?, *kind)),
            Decoration::DoubleRing { color } => {
                Ok(ring::double_ring(&self.avatar(&source)?, *color))
            }
            Decoration::DottedRing { color, count } => {
                Ok(ring::dotted_ring(&self.avatar(&source)?, *color, *count))
            }
        }
    }

    /// Circular avatar at `avatar_size`, the base of the ring-family decorations.
    fn avatar(&self, source: &RgbaImage) -> Result<RgbaImage> {
        Ok(circular_crop(&fit_square(source, self.avatar_size)?))
    }
}

pub fn load_font(path: &Path) -> Result<FontArc> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read font: {}", path.display()))?;
    FontArc::try_from_vec(bytes)
        .with_context(|| format!("Failed to parse font: {}", path.display()))
}
