use decorbot::decorate::overlay::{
    compose_with_overlay, estimate_hole_radius, load_overlay, validate_overlay_name,
    HOLE_ALPHA_THRESHOLD, HOLE_PADDING,
};
use decorbot::decorate::{Decoration, Decorator};
use image::{DynamicImage, Rgba, RgbaImage};

const GREEN: Rgba<u8> = Rgba([0, 200, 0, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// 100x100 opaque frame with a transparent circular hole of radius 30.
fn frame() -> RgbaImage {
    RgbaImage::from_fn(100, 100, |x, y| {
        let dx = x as i64 - 50;
        let dy = y as i64 - 50;
        if dx * dx + dy * dy > 30 * 30 {
            GREEN
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

#[test]
fn hole_radius_from_frame() {
    assert_eq!(
        estimate_hole_radius(&frame(), HOLE_ALPHA_THRESHOLD, HOLE_PADDING),
        Some(29)
    );
}

#[test]
fn hole_radius_none_when_center_is_opaque() {
    let solid = RgbaImage::from_pixel(20, 20, GREEN);
    assert_eq!(estimate_hole_radius(&solid, 10, 2), None);
}

#[test]
fn hole_radius_of_fully_transparent_image_is_bounded_by_edges() {
    let clear = RgbaImage::new(10, 10);
    assert_eq!(estimate_hole_radius(&clear, 10, 2), Some(3));
}

#[test]
fn faint_pixels_count_as_hole() {
    let faint = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 10]));
    assert_eq!(estimate_hole_radius(&faint, 10, 0), Some(5));
}

#[test]
fn compose_centers_avatar_under_frame() {
    let avatar = RgbaImage::from_pixel(64, 64, RED);
    let out = compose_with_overlay(&avatar, &frame(), 1.0).unwrap();

    assert_eq!(out.dimensions(), (100, 100));
    let center = out.get_pixel(50, 50);
    assert!(center[0] >= 253 && center[1] <= 2 && center[3] >= 253, "{:?}", center);
    assert_eq!(*out.get_pixel(2, 2), GREEN);
    // Between the shrunken avatar (radius 29) and the frame edge (30).
    assert_eq!(out.get_pixel(50, 20)[3], 0);
}

#[test]
fn compose_without_hole_uses_fallback_diameter() {
    let avatar = RgbaImage::from_pixel(64, 64, RED);
    let overlay = RgbaImage::from_fn(100, 100, |x, _| {
        if x < 5 {
            GREEN
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    // Opaque center: the avatar is drawn underneath and fully hidden.
    let out = compose_with_overlay(&avatar, &overlay, 1.0).unwrap();
    assert_eq!(out.dimensions(), (100, 100));
    assert_eq!(*out.get_pixel(50, 50), Rgba([0, 0, 0, 255]));
}

#[test]
fn overlay_names_cannot_escape_directory() {
    assert!(validate_overlay_name("frame.png").is_ok());
    assert!(validate_overlay_name("../secret.png").is_err());
    assert!(validate_overlay_name("dir/frame.png").is_err());
    assert!(validate_overlay_name("dir\\frame.png").is_err());
    assert!(validate_overlay_name("").is_err());
}

#[test]
fn load_overlay_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    frame().save(dir.path().join("frame.png")).unwrap();

    let loaded = load_overlay(dir.path(), "frame.png").unwrap();
    assert_eq!(loaded.dimensions(), (100, 100));

    let err = load_overlay(dir.path(), "missing.png").unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn decorator_applies_overlay() {
    let dir = tempfile::tempdir().unwrap();
    frame().save(dir.path().join("frame.png")).unwrap();

    let decorator = Decorator {
        overlays_dir: dir.path().to_path_buf(),
        ..Decorator::default()
    };
    let out = decorator
        .apply(
            &Decoration::Overlay {
                file: "frame.png".into(),
                scale: 1.0,
            },
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(300, 300, RED)),
            "",
        )
        .unwrap();

    assert_eq!(out.dimensions(), (100, 100));
    assert_eq!(*out.get_pixel(0, 0), GREEN);
}
