use image::{GrayImage, Luma, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use imageproc::filter::gaussian_blur_f32;

use crate::color::Color;
use crate::imaging::{annulus_mask, apply_mask, composite, tint_mask, transparent};

/// Solid ring flush with the avatar's edge.
pub fn ring(avatar: &RgbaImage, color: Color) -> RgbaImage {
    let size = avatar.width();
    let radius = size as f32 / 2.0;
    let thickness = ((size as f32 * 0.08) as u32).max(2) as f32;

    let mask = annulus_mask(size, radius, radius - thickness);
    let mut out = avatar.clone();
    composite(&mut out, &tint_mask(&mask, color));
    out
}

/// Ring filled with a left-to-right linear gradient from `from` to `to`.
pub fn gradient_ring(avatar: &RgbaImage, from: Color, to: Color) -> RgbaImage {
    let size = avatar.width();
    let radius = size as f32 / 2.0;
    let thickness = ((size as f32 * 0.1) as u32).max(3) as f32;

    let columns: Vec<Color> = (0..size)
        .map(|x| {
            let t = x as f32 / size.saturating_sub(1).max(1) as f32;
            from.lerp(to, t)
        })
        .collect();

    let mut layer = RgbaImage::from_fn(size, size, |x, _| columns[x as usize].to_rgba(255));
    let mask = gaussian_blur_f32(&annulus_mask(size, radius, radius - thickness), 1.0);
    apply_mask(&mut layer, &mask);

    let mut out = avatar.clone();
    composite(&mut out, &layer);
    out
}

/// Two concentric rings separated by a gap.
pub fn double_ring(avatar: &RgbaImage, color: Color) -> RgbaImage {
    let size = avatar.width();
    let radius = size as f32 / 2.0;
    let thickness = ((size as f32 * 0.05) as u32).max(3) as f32;
    let gap = (size as f32 * 0.06).floor();

    let outer = annulus_mask(size, radius, radius - thickness);
    let inner_edge = radius - thickness - gap;
    let inner = annulus_mask(size, inner_edge, inner_edge - thickness);
    let mask = GrayImage::from_fn(size, size, |x, y| {
        Luma([outer.get_pixel(x, y)[0].max(inner.get_pixel(x, y)[0])])
    });

    let mut out = avatar.clone();
    composite(&mut out, &tint_mask(&mask, color));
    out
}

/// `count` evenly spaced dots just inside the avatar's edge.
pub fn dotted_ring(avatar: &RgbaImage, color: Color, count: u32) -> RgbaImage {
    let size = avatar.width();
    let dot = ((size as f32 * 0.02) as u32).max(2);
    let center = size as f32 / 2.0;
    let orbit = center - dot as f32 - 1.0;

    let mut layer = transparent(size, size);
    for i in 0..count {
        let theta = std::f32::consts::TAU * i as f32 / count as f32;
        let x = center + theta.cos() * orbit;
        let y = center + theta.sin() * orbit;
        draw_filled_circle_mut(
            &mut layer,
            (x.round() as i32, y.round() as i32),
            dot as i32,
            color.to_rgba(255),
        );
    }

    let mut out = avatar.clone();
    composite(&mut out, &layer);
    out
}
