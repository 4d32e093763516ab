use std::f32::consts::PI;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::imaging::{composite, transparent};

const STAR_FILL: Rgba<u8> = Rgba([255, 223, 0, 230]);
const STAR_OUTLINE: Rgba<u8> = Rgba([255, 180, 0, 255]);
const HEART_FILL: Rgba<u8> = Rgba([255, 64, 129, 230]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickerKind {
    Star,
    Heart,
}

impl StickerKind {
    /// `estrela` / `star` pick the star; every other name gets the heart.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "estrela" | "star" => StickerKind::Star,
            _ => StickerKind::Heart,
        }
    }
}

pub fn add_sticker(avatar: &RgbaImage, kind: StickerKind) -> RgbaImage {
    let size = avatar.width();
    let mut layer = transparent(size, size);

    match kind {
        StickerKind::Star => draw_star(&mut layer, size),
        StickerKind::Heart => draw_heart(&mut layer, size),
    }

    let mut out = avatar.clone();
    composite(&mut out, &layer);
    out
}

/// Vertices of a five-point star, alternating outer and inner radius,
/// starting at the top.
pub fn star_points(cx: i32, cy: i32, outer: i32) -> Vec<Point<i32>> {
    let inner = outer / 2;
    (0..10)
        .map(|i| {
            let angle = i as f32 * PI / 5.0;
            let r = if i % 2 == 0 { outer as f32 } else { inner as f32 };
            Point::new(
                cx + (r * angle.sin()) as i32,
                cy - (r * angle.cos()) as i32,
            )
        })
        .collect()
}

fn draw_star(layer: &mut RgbaImage, size: u32) {
    let s = size as f32;
    let center = (s * 0.78) as i32;
    let outer = (s * 0.16) as i32;
    if outer < 2 {
        return;
    }

    let points = star_points(center, center, outer);
    draw_polygon_mut(layer, &points, STAR_FILL);

    // Two offset passes give a 2px outline.
    for (dx, dy) in [(0.0, 0.0), (1.0, 1.0)] {
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            draw_line_segment_mut(
                layer,
                (a.x as f32 + dx, a.y as f32 + dy),
                (b.x as f32 + dx, b.y as f32 + dy),
                STAR_OUTLINE,
            );
        }
    }
}

fn draw_heart(layer: &mut RgbaImage, size: u32) {
    let s = size as f32;
    let cx = (s * 0.8) as i32;
    let cy = (s * 0.78) as i32;
    let r = (s * 0.1) as i32;
    if r < 2 {
        return;
    }
    let lift = (s * 0.01).round().max(1.0) as i32;

    // Lobes: each spans half the heart's width and its full height.
    draw_filled_ellipse_mut(layer, (cx - r / 2, cy - lift), r / 2, r, HEART_FILL);
    draw_filled_ellipse_mut(layer, (cx + r / 2, cy - lift), r / 2, r, HEART_FILL);

    let tip = cy + (1.5 * r as f32) as i32;
    draw_polygon_mut(
        layer,
        &[
            Point::new(cx - r, cy),
            Point::new(cx + r, cy),
            Point::new(cx, tip),
        ],
        HEART_FILL,
    );
}
