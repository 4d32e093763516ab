use std::io::Cursor;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::alpha_bleed;

/// Upper bound on either side of an incoming image, checked before decoding
/// pixel data.
pub const MAX_INPUT_DIMENSION: u32 = 8192;

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to read image")?;

    let (w, h) = reader
        .into_dimensions()
        .context("Unsupported or corrupt image")?;
    if w > MAX_INPUT_DIMENSION || h > MAX_INPUT_DIMENSION {
        anyhow::bail!(
            "Image is too large ({}x{}, max {})",
            w,
            h,
            MAX_INPUT_DIMENSION
        );
    }

    image::load_from_memory(bytes).context("Failed to decode image")
}

/// Encodes as PNG, optionally alpha bleeding first.
pub fn encode_png(mut img: RgbaImage, bleed: bool) -> Result<Vec<u8>> {
    if bleed {
        alpha_bleed::alpha_bleed(&mut img);
    }

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .context("Failed to encode PNG")?;

    Ok(buf)
}
