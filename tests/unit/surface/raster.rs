use super::*;

use crate::surface::with_scope;

fn opaque(r: u8, g: u8, b: u8) -> Rgba8Premul {
    Rgba8Premul { r, g, b, a: 255 }
}

#[test]
fn fill_rect_writes_inside_and_clips_to_bounds() {
    let mut s = RasterSurface::new(CanvasSize::new(8, 8));
    s.fill_rect(Rect::new(2.0, 2.0, 6.0, 6.0), opaque(255, 0, 0));

    assert_eq!(s.pixel(3, 3), opaque(255, 0, 0));
    assert_eq!(s.pixel(0, 0), Rgba8Premul::transparent());
    assert_eq!(s.pixel(6, 6), Rgba8Premul::transparent());

    // Partially off-surface fills clip instead of panicking.
    s.fill_rect(Rect::new(-10.0, -10.0, 100.0, 1.0), opaque(0, 255, 0));
    assert_eq!(s.pixel(7, 0), opaque(0, 255, 0));
}

#[test]
fn fill_blends_source_over_premultiplied() {
    let mut s = RasterSurface::new(CanvasSize::new(2, 1));
    s.clear(opaque(0, 0, 255));

    // 50% straight red premultiplies to (128, 0, 0, 128).
    let half_red = Rgba8Premul::from_straight_rgba(255, 0, 0, 128);
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 1.0), half_red);

    let px = s.pixel(0, 0);
    assert_eq!(px.a, 255);
    assert_eq!(px.r, 128);
    // Remaining blue: 255 * (1 - 128/255).
    assert_eq!(px.b, 127);
}

#[test]
fn transform_applies_to_fills() {
    let mut s = RasterSurface::new(CanvasSize::new(8, 8));
    s.set_transform(Affine::translate((4.0, 0.0)));
    s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), opaque(255, 255, 255));

    assert_eq!(s.pixel(5, 1), opaque(255, 255, 255));
    assert_eq!(s.pixel(1, 1), Rgba8Premul::transparent());
}

#[test]
fn save_restore_isolates_transforms() {
    let mut s = RasterSurface::new(CanvasSize::new(8, 8));
    s.save();
    s.set_transform(Affine::translate((4.0, 4.0)));
    s.restore();

    s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), opaque(255, 0, 0));
    assert_eq!(s.pixel(0, 0), opaque(255, 0, 0));
    assert_eq!(s.pixel(4, 4), Rgba8Premul::transparent());
}

#[test]
fn with_scope_restores_even_on_error() {
    let mut s = RasterSurface::new(CanvasSize::new(8, 8));
    let result = with_scope(&mut s, |surface| {
        surface.set_transform(Affine::translate((4.0, 4.0)));
        Err(LenslayerError::callback("draw exploded"))
    });
    assert!(result.is_err());

    s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), opaque(0, 255, 0));
    assert_eq!(s.pixel(0, 0), opaque(0, 255, 0));
}

#[test]
fn stroke_rect_paints_edges_not_interior() {
    let mut s = RasterSurface::new(CanvasSize::new(8, 8));
    s.stroke_rect(Rect::new(2.0, 2.0, 6.0, 6.0), opaque(255, 255, 0), 1.0);

    assert_eq!(s.pixel(1, 1), opaque(255, 255, 0)); // outside corner of the band
    assert_eq!(s.pixel(4, 4), Rgba8Premul::transparent()); // interior untouched
}

#[test]
fn blit_requires_matching_dimensions() {
    let mut s = RasterSurface::new(CanvasSize::new(4, 4));
    let wrong = vec![0u8; CanvasSize::new(2, 2).pixel_bytes()];
    assert!(s.blit_rgba8(CanvasSize::new(2, 2), &wrong).is_err());
    assert!(s.blit_rgba8(CanvasSize::new(4, 4), &wrong).is_err());

    let frame = vec![255u8; CanvasSize::new(4, 4).pixel_bytes()];
    s.blit_rgba8(CanvasSize::new(4, 4), &frame).unwrap();
    assert_eq!(s.pixel(2, 2), opaque(255, 255, 255));
}
