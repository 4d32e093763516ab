//! Raster helpers shared by the decorations: square cropping, anti-aliased
//! circular masks and alpha compositing.
//!
//! Masks are `GrayImage`s where 255 means fully covered. Coverage is computed
//! from the distance between a pixel's center and the mask's center, with a
//! one pixel wide linear falloff at every edge.

use anyhow::{bail, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

use crate::color::Color;

pub fn ensure_rgba(image: DynamicImage) -> RgbaImage {
    image.into_rgba8()
}

/// Crops the centered `min(w, h)` square.
pub fn center_square(image: &RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    let size = w.min(h);
    imageops::crop_imm(image, (w - size) / 2, (h - size) / 2, size, size).to_image()
}

pub fn resize_to_square(image: &RgbaImage, size: u32) -> RgbaImage {
    imageops::resize(image, size, size, FilterType::Lanczos3)
}

/// Center-crops and rescales to exactly `size x size`.
pub fn fit_square(image: &RgbaImage, size: u32) -> Result<RgbaImage> {
    if image.width() == 0 || image.height() == 0 {
        bail!("Image is empty ({}x{})", image.width(), image.height());
    }
    if size == 0 {
        bail!("Target size must be positive");
    }

    let square = center_square(image);
    if square.width() == size {
        return Ok(square);
    }
    Ok(resize_to_square(&square, size))
}

/// Center square of `image` with everything outside the inscribed circle
/// made transparent.
pub fn circular_crop(image: &RgbaImage) -> RgbaImage {
    let mut square = center_square(image);
    let mask = disk_mask(square.width());
    apply_mask(&mut square, &mask);
    square
}

/// Fraction of a pixel covered by an edge at signed distance `d` (positive inside).
fn coverage(d: f32) -> f32 {
    (d + 0.5).clamp(0.0, 1.0)
}

fn distance_from_center(size: u32, x: u32, y: u32) -> f32 {
    let c = size as f32 / 2.0;
    let dx = x as f32 + 0.5 - c;
    let dy = y as f32 + 0.5 - c;
    (dx * dx + dy * dy).sqrt()
}

pub fn disk_mask(size: u32) -> GrayImage {
    annulus_mask(size, size as f32 / 2.0, 0.0)
}

/// Ring between radii `inner` and `outer`, both measured from the center.
/// An `inner` of zero or less produces a filled disk.
pub fn annulus_mask(size: u32, outer: f32, inner: f32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        let d = distance_from_center(size, x, y);
        let mut cover = coverage(outer - d);
        if inner > 0.0 {
            cover *= coverage(d - inner);
        }
        Luma([(cover * 255.0).round() as u8])
    })
}

/// Multiplies the alpha channel of `image` by `mask`.
pub fn apply_mask(image: &mut RgbaImage, mask: &GrayImage) {
    for (pixel, m) in image.pixels_mut().zip(mask.pixels()) {
        pixel[3] = ((pixel[3] as u16 * m[0] as u16 + 127) / 255) as u8;
    }
}

/// A solid `color` layer whose alpha is `mask`.
pub fn tint_mask(mask: &GrayImage, color: Color) -> RgbaImage {
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        color.to_rgba(mask.get_pixel(x, y)[0])
    })
}

/// Alpha-composites `layer` over `base` at the given offset.
pub fn composite_at(base: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(base, layer, x, y);
}

pub fn composite(base: &mut RgbaImage, layer: &RgbaImage) {
    composite_at(base, layer, 0, 0);
}

pub fn transparent(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
}
