use std::ops::Range;
use std::path::Path;

use ab_glyph::FontArc;
use decorbot::color::{Color, BLURPLE};
use decorbot::config::RenderConfig;
use decorbot::decorate::profile::{
    compose_profile_preview, truncate_name, CARD_HEIGHT, CARD_WIDTH,
};
use decorbot::decorate::sticker::star_points;
use decorbot::decorate::{load_font, Decoration, Decorator, StickerKind};
use image::{DynamicImage, Rgba, RgbaImage};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn decorator() -> Decorator {
    Decorator {
        avatar_size: 128,
        ..Decorator::default()
    }
}

fn solid(color: Rgba<u8>, w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, color))
}

fn render(decoration: Decoration) -> RgbaImage {
    decorator()
        .apply(&decoration, solid(RED, 200, 100), "Tester")
        .unwrap()
}

fn assert_close(actual: Rgba<u8>, expected: Rgba<u8>, tolerance: u8) {
    for i in 0..4 {
        let diff = actual[i].abs_diff(expected[i]);
        assert!(
            diff <= tolerance,
            "channel {} differs: {:?} vs {:?}",
            i,
            actual,
            expected
        );
    }
}

#[test]
fn ring_draws_band_at_the_edge() {
    let out = render(Decoration::Ring { color: BLURPLE });
    assert_eq!(out.dimensions(), (128, 128));
    assert_eq!(*out.get_pixel(64, 2), BLURPLE.to_rgba(255));
    assert_close(*out.get_pixel(64, 64), RED, 2);
    assert_eq!(out.get_pixel(0, 0)[3], 0);
}

#[test]
fn gradient_ring_goes_left_to_right() {
    let blue = Color::rgb(0, 112, 244);
    let out = decorator()
        .apply(
            &Decoration::GradientRing {
                from: Color::rgb(255, 0, 0),
                to: blue,
            },
            solid(Rgba([255, 255, 255, 255]), 128, 128),
            "",
        )
        .unwrap();

    let left = out.get_pixel(4, 64);
    assert!(left[0] > 220 && left[2] < 40, "left was {:?}", left);

    let right = out.get_pixel(123, 64);
    assert!(right[2] > 200 && right[0] < 40, "right was {:?}", right);

    // Inside the ring the avatar is untouched.
    assert_close(*out.get_pixel(64, 64), Rgba([255, 255, 255, 255]), 2);
}

#[test]
fn glow_pads_canvas_and_tints_halo() {
    let green = Color::rgb(0, 200, 0);
    let out = render(Decoration::Glow { color: green });
    assert_eq!(out.dimensions(), (164, 164));

    assert_close(*out.get_pixel(82, 82), RED, 2);

    let halo = out.get_pixel(82, 14);
    assert!(halo[3] > 30, "halo alpha was {}", halo[3]);
    assert_eq!([halo[0], halo[1], halo[2]], [0, 200, 0]);

    assert!(out.get_pixel(0, 0)[3] < halo[3]);
}

#[test]
fn star_sticker_is_yellow_in_the_lower_right() {
    let out = render(Decoration::Sticker(StickerKind::Star));
    let px = out.get_pixel(99, 99);
    assert!(px[0] > 240, "{:?}", px);
    assert!((190..=210).contains(&px[1]), "{:?}", px);
    assert!(px[2] < 10, "{:?}", px);

    // Upper left stays plain avatar.
    assert_close(*out.get_pixel(40, 40), RED, 2);
}

#[test]
fn heart_sticker_is_pink() {
    let out = render(Decoration::Sticker(StickerKind::Heart));
    let px = out.get_pixel(102, 104);
    assert!(px[2] > 100, "{:?}", px);
    assert!(px[1] > 40 && px[1] < 80, "{:?}", px);
}

#[test]
fn star_points_alternate_radii() {
    let points = star_points(50, 50, 20);
    assert_eq!(points.len(), 10);
    assert_eq!((points[0].x, points[0].y), (50, 30));
    assert_eq!((points[5].x, points[5].y), (50, 60));
}

#[test]
fn double_ring_leaves_a_gap() {
    let out = render(Decoration::DoubleRing { color: BLURPLE });
    assert_eq!(*out.get_pixel(64, 2), BLURPLE.to_rgba(255));
    assert_close(*out.get_pixel(64, 9), RED, 2);
    assert_eq!(*out.get_pixel(64, 16), BLURPLE.to_rgba(255));
}

#[test]
fn dotted_ring_places_dots_on_the_orbit() {
    let out = render(Decoration::DottedRing {
        color: BLURPLE,
        count: 4,
    });
    assert_eq!(*out.get_pixel(125, 64), BLURPLE.to_rgba(255));
    assert_eq!(*out.get_pixel(64, 125), BLURPLE.to_rgba(255));
    assert_close(*out.get_pixel(107, 107), RED, 2);
}

#[test]
fn profile_card_layout_without_font() {
    let out = render(Decoration::Profile);
    assert_eq!(out.dimensions(), (CARD_WIDTH, CARD_HEIGHT));
    assert_eq!(*out.get_pixel(2, 100), Rgba([88, 101, 242, 255]));
    assert_eq!(*out.get_pixel(300, 230), Rgba([49, 51, 56, 255]));
    assert_close(*out.get_pixel(120, 120), RED, 2);
    // Avatar corner shows the card background.
    assert_eq!(*out.get_pixel(26, 26), Rgba([49, 51, 56, 255]));
}

/// First system font found, if any. Text tests are skipped without one.
fn system_font() -> Option<FontArc> {
    let path = RenderConfig::default().resolve_font(Path::new("."))?;
    load_font(&path).ok()
}

/// Whether any pixel right of the avatar, in rows `rows`, differs from the
/// card background.
fn text_in_rows(card: &RgbaImage, rows: Range<u32>) -> bool {
    let background = Rgba([49, 51, 56, 255]);
    rows.flat_map(|y| (240..CARD_WIDTH).map(move |x| (x, y)))
        .any(|(x, y)| *card.get_pixel(x, y) != background)
}

#[test]
fn profile_card_draws_name_and_captions() {
    let Some(font) = system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let captions = vec!["first caption".to_string(), "second caption".to_string()];
    let avatar = RgbaImage::from_pixel(64, 64, RED);

    let card = compose_profile_preview(&avatar, "Tester", &captions, Some(&font)).unwrap();

    assert!(text_in_rows(&card, 28..52), "name missing");
    assert!(text_in_rows(&card, 60..78), "first caption missing");
    assert!(text_in_rows(&card, 82..100), "second caption missing");
    assert!(!text_in_rows(&card, 106..CARD_HEIGHT), "text below last caption");
    // Text starts at x=240, clear of the avatar column.
    assert_eq!(*card.get_pixel(230, 40), Rgba([49, 51, 56, 255]));
}

#[test]
fn profile_card_stops_captions_at_the_bottom_edge() {
    let Some(font) = system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let captions: Vec<String> = (0..20).map(|i| format!("line {}", i)).collect();
    let name = "W".repeat(80);

    let card = compose_profile_preview(&RgbaImage::from_pixel(8, 8, RED), &name, &captions, Some(&font))
        .unwrap();

    assert_eq!(card.dimensions(), (CARD_WIDTH, CARD_HEIGHT));
    assert!(text_in_rows(&card, 28..52));
    // Caption 7 sits at y=214, the last fully visible row.
    assert!(text_in_rows(&card, 214..232));
}

#[test]
fn avatar_decorations_start_from_circular_avatar() {
    for decoration in [
        Decoration::Ring { color: BLURPLE },
        Decoration::GradientRing {
            from: BLURPLE,
            to: Color::rgb(0, 0, 0),
        },
        Decoration::Glow { color: BLURPLE },
        Decoration::Sticker(StickerKind::Star),
        Decoration::DoubleRing { color: BLURPLE },
        Decoration::DottedRing {
            color: BLURPLE,
            count: 8,
        },
    ] {
        let out = render(decoration.clone());
        let expected = match decoration {
            Decoration::Glow { .. } => 128 + 2 * 18,
            _ => 128,
        };
        assert_eq!(out.dimensions(), (expected, expected), "{}", decoration);
        assert_eq!(out.get_pixel(0, 0)[3], 0, "{}", decoration);
        assert_close(*out.get_pixel(expected / 2, expected / 2), RED, 2);
    }
}

#[test]
fn square_output_for_non_square_input() {
    for decoration in [
        Decoration::Ring { color: BLURPLE },
        Decoration::Sticker(StickerKind::Heart),
    ] {
        let out = decorator()
            .apply(&decoration, solid(RED, 40, 300), "")
            .unwrap();
        assert_eq!(out.width(), out.height());
    }
}

#[test]
fn empty_image_is_an_error() {
    let result = decorator().apply(
        &Decoration::Ring { color: BLURPLE },
        DynamicImage::ImageRgba8(RgbaImage::new(0, 0)),
        "",
    );
    assert!(result.is_err());
}

#[test]
fn long_names_are_truncated() {
    assert_eq!(truncate_name("short"), "short");
    let long = "a".repeat(40);
    let short = truncate_name(&long);
    assert_eq!(short.chars().count(), 28);
    assert!(short.ends_with('…'));
}

#[test]
fn decoration_display() {
    assert_eq!(
        Decoration::Ring { color: BLURPLE }.to_string(),
        "ring #5865f2"
    );
    assert_eq!(Decoration::Profile.to_string(), "profile");
    assert_eq!(
        Decoration::DottedRing {
            color: BLURPLE,
            count: 12
        }
        .to_string(),
        "dotted #5865f2 12"
    );
}
