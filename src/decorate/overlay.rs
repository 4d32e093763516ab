//! Frame overlays: a user-supplied PNG with a transparent hole in the middle,
//! drawn on top of the circular avatar.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::RgbaImage;

use crate::imaging::{circular_crop, composite, composite_at, fit_square, transparent};

/// Alpha at or below this counts as part of the hole.
pub const HOLE_ALPHA_THRESHOLD: u8 = 10;
pub const HOLE_PADDING: u32 = 2;

/// Diameter fraction used when the overlay has no detectable hole.
const FALLBACK_FILL: f32 = 0.85;

/// Walks from the center of `overlay` in the four axis directions until an
/// opaque pixel is hit and returns the shortest distance minus `padding`.
/// `None` when the center itself is opaque.
pub fn estimate_hole_radius(overlay: &RgbaImage, threshold: u8, padding: u32) -> Option<u32> {
    let (w, h) = overlay.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let (cx, cy) = ((w / 2) as i64, (h / 2) as i64);

    let scan = |dx: i64, dy: i64| -> u32 {
        let (mut x, mut y) = (cx, cy);
        let mut r = 0u32;
        while x >= 0 && y >= 0 && x < w as i64 && y < h as i64 {
            if overlay.get_pixel(x as u32, y as u32)[3] > threshold {
                break;
            }
            r += 1;
            x += dx;
            y += dy;
        }
        r.saturating_sub(padding)
    };

    let radius = [scan(0, -1), scan(0, 1), scan(-1, 0), scan(1, 0)]
        .into_iter()
        .min()
        .unwrap_or(0);

    (radius > 0).then_some(radius)
}

/// Places a circular crop of `image` centered under `overlay`. The result has
/// the overlay's dimensions.
pub fn compose_with_overlay(image: &RgbaImage, overlay: &RgbaImage, scale: f32) -> Result<RgbaImage> {
    let (w, h) = overlay.dimensions();
    let scale = scale.clamp(0.1, 2.0);

    let diameter = match estimate_hole_radius(overlay, HOLE_ALPHA_THRESHOLD, HOLE_PADDING) {
        Some(radius) => (radius as f32 * 2.0 * scale) as u32,
        None => (w.min(h) as f32 * FALLBACK_FILL * scale) as u32,
    };
    if diameter == 0 {
        bail!("Overlay is too small ({}x{})", w, h);
    }

    let avatar = circular_crop(&fit_square(image, diameter)?);
    let x = (w as i64 - diameter as i64) / 2;
    let y = (h as i64 - diameter as i64) / 2;

    let mut out = transparent(w, h);
    composite_at(&mut out, &avatar, x, y);
    composite(&mut out, overlay);
    Ok(out)
}

/// Rejects anything that could escape the overlays directory.
pub fn validate_overlay_name(file: &str) -> Result<()> {
    if file.is_empty()
        || file.contains('/')
        || file.contains('\\')
        || file.contains("..")
        || Path::new(file).is_absolute()
    {
        bail!("Invalid overlay name '{}'", file);
    }
    Ok(())
}

pub fn load_overlay(dir: &Path, file: &str) -> Result<RgbaImage> {
    validate_overlay_name(file)?;

    let path = dir.join(file);
    if !path.is_file() {
        bail!("Overlay '{}' not found in {}", file, dir.display());
    }

    let image =
        image::open(&path).with_context(|| format!("Failed to open overlay: {}", path.display()))?;
    Ok(image.into_rgba8())
}
