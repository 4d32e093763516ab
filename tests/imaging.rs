use decorbot::color::Color;
use decorbot::imaging::{
    annulus_mask, apply_mask, center_square, circular_crop, composite, disk_mask, fit_square,
    tint_mask, transparent,
};
use image::{GrayImage, Luma, Rgba, RgbaImage};

#[test]
fn center_square_takes_middle_of_wide_image() {
    let img = RgbaImage::from_fn(10, 6, |x, _| Rgba([x as u8, 0, 0, 255]));
    let square = center_square(&img);
    assert_eq!(square.dimensions(), (6, 6));
    assert_eq!(square.get_pixel(0, 0)[0], 2);
    assert_eq!(square.get_pixel(5, 0)[0], 7);
}

#[test]
fn center_square_takes_middle_of_tall_image() {
    let img = RgbaImage::from_fn(4, 9, |_, y| Rgba([0, y as u8, 0, 255]));
    let square = center_square(&img);
    assert_eq!(square.dimensions(), (4, 4));
    assert_eq!(square.get_pixel(0, 0)[1], 2);
}

#[test]
fn fit_square_resizes() {
    let img = RgbaImage::from_pixel(300, 200, Rgba([10, 20, 30, 255]));
    let out = fit_square(&img, 64).unwrap();
    assert_eq!(out.dimensions(), (64, 64));
}

#[test]
fn fit_square_rejects_empty_images() {
    assert!(fit_square(&RgbaImage::new(0, 0), 64).is_err());
    assert!(fit_square(&RgbaImage::new(10, 0), 64).is_err());
}

#[test]
fn circular_crop_is_square_with_transparent_corners() {
    let img = RgbaImage::from_pixel(120, 80, Rgba([200, 100, 50, 255]));
    let out = circular_crop(&img);
    assert_eq!(out.dimensions(), (80, 80));
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(out.get_pixel(79, 79)[3], 0);
    assert_eq!(*out.get_pixel(40, 40), Rgba([200, 100, 50, 255]));
}

#[test]
fn disk_mask_center_and_corners() {
    let mask = disk_mask(64);
    assert_eq!(mask.get_pixel(32, 32)[0], 255);
    assert_eq!(mask.get_pixel(0, 0)[0], 0);
    assert_eq!(mask.get_pixel(63, 0)[0], 0);
    assert!(mask.get_pixel(0, 32)[0] > 200);
}

#[test]
fn annulus_mask_has_a_hole() {
    let mask = annulus_mask(100, 50.0, 40.0);
    assert_eq!(mask.get_pixel(50, 50)[0], 0);
    assert_eq!(mask.get_pixel(50, 5)[0], 255);
    assert_eq!(mask.get_pixel(50, 20)[0], 0);
    assert_eq!(mask.get_pixel(0, 0)[0], 0);
}

#[test]
fn apply_mask_scales_alpha() {
    let mut img = RgbaImage::from_pixel(2, 1, Rgba([1, 2, 3, 255]));
    let mask = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 255 }]));
    apply_mask(&mut img, &mask);
    assert_eq!(img.get_pixel(0, 0)[3], 0);
    assert_eq!(*img.get_pixel(1, 0), Rgba([1, 2, 3, 255]));
}

#[test]
fn tint_mask_uses_mask_as_alpha() {
    let mask = GrayImage::from_pixel(3, 3, Luma([77]));
    let layer = tint_mask(&mask, Color::rgb(9, 8, 7));
    assert_eq!(*layer.get_pixel(1, 1), Rgba([9, 8, 7, 77]));
}

#[test]
fn composite_opaque_layer_replaces_and_transparent_keeps() {
    let mut base = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
    let mut layer = transparent(2, 1);
    layer.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
    composite(&mut base, &layer);
    assert_eq!(*base.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*base.get_pixel(1, 0), Rgba([0, 0, 255, 255]));
}
