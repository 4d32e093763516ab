use ab_glyph::{FontArc, PxScale};
use anyhow::Result;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::imaging::{circular_crop, composite_at, fit_square};

pub const CARD_WIDTH: u32 = 600;
pub const CARD_HEIGHT: u32 = 240;
pub const AVATAR_SIZE: u32 = 192;
const AVATAR_LEFT: i64 = 24;
const ACCENT_WIDTH: u32 = 8;
const TEXT_LEFT: i32 = 240;
const NAME_TOP: i32 = 28;
const CAPTION_TOP: i32 = 60;
const CAPTION_STEP: i32 = 22;
const NAME_SCALE: f32 = 24.0;
const CAPTION_SCALE: f32 = 18.0;
const MAX_NAME_CHARS: usize = 28;

const BACKGROUND: Rgba<u8> = Rgba([49, 51, 56, 255]);
const ACCENT: Rgba<u8> = Rgba([88, 101, 242, 255]);
const NAME_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const CAPTION_COLOR: Rgba<u8> = Rgba([220, 221, 222, 255]);

pub fn default_captions() -> Vec<String> {
    [
        "Look at me I'm a beautiful butterfly",
        "Fluttering in the moonlight",
        "Waiting for the day when",
        "I get an avatar decoration",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Builds the profile preview card. Text is skipped when `font` is `None`.
pub fn compose_profile_preview(
    image: &RgbaImage,
    display_name: &str,
    captions: &[String],
    font: Option<&FontArc>,
) -> Result<RgbaImage> {
    let avatar = circular_crop(&fit_square(image, AVATAR_SIZE)?);

    let mut card = RgbaImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, BACKGROUND);
    draw_filled_rect_mut(
        &mut card,
        Rect::at(0, 0).of_size(ACCENT_WIDTH, CARD_HEIGHT),
        ACCENT,
    );

    let top = (CARD_HEIGHT - AVATAR_SIZE) as i64 / 2;
    composite_at(&mut card, &avatar, AVATAR_LEFT, top);

    let Some(font) = font else {
        return Ok(card);
    };

    draw_text_mut(
        &mut card,
        NAME_COLOR,
        TEXT_LEFT,
        NAME_TOP,
        PxScale::from(NAME_SCALE),
        font,
        &truncate_name(display_name),
    );

    for (i, line) in captions.iter().enumerate() {
        let y = CAPTION_TOP + CAPTION_STEP * i as i32;
        if y >= CARD_HEIGHT as i32 {
            break;
        }
        draw_text_mut(
            &mut card,
            CAPTION_COLOR,
            TEXT_LEFT,
            y,
            PxScale::from(CAPTION_SCALE),
            font,
            line,
        );
    }

    Ok(card)
}

/// Keeps the display name inside the card.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_CHARS {
        return name.to_string();
    }
    let mut short: String = name.chars().take(MAX_NAME_CHARS - 1).collect();
    short.push('…');
    short
}
