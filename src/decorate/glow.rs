use image::{GrayImage, Luma, RgbaImage};
use imageproc::filter::gaussian_blur_f32;

use crate::color::Color;
use crate::imaging::{composite_at, tint_mask};

pub const DEFAULT_GLOW_RADIUS: u32 = 18;

/// Renders a blurred, colored silhouette of `avatar` behind it.
///
/// The canvas grows by `radius` on every side so the halo is not clipped at
/// the avatar's own bounds; the avatar sits centered on top.
pub fn glow(avatar: &RgbaImage, color: Color, radius: u32) -> RgbaImage {
    let (w, h) = avatar.dimensions();
    let pad = radius;
    let (canvas_w, canvas_h) = (w + 2 * pad, h + 2 * pad);

    let mut silhouette = GrayImage::new(canvas_w, canvas_h);
    for (x, y, pixel) in avatar.enumerate_pixels() {
        silhouette.put_pixel(x + pad, y + pad, Luma([pixel[3]]));
    }

    let sigma = radius.max(1) as f32;
    let halo = gaussian_blur_f32(&silhouette, sigma);

    let mut out = tint_mask(&halo, color);
    composite_at(&mut out, avatar, pad as i64, pad as i64);
    out
}
