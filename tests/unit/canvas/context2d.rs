use super::*;

#[test]
fn new_surface_is_transparent() {
    let mut ctx = Context2d::new(4, 3).unwrap();
    assert_eq!(ctx.width(), 4);
    assert_eq!(ctx.height(), 3);
    assert_eq!(ctx.get_pixel(3, 2).unwrap(), Rgba8::TRANSPARENT);
}

#[test]
fn rejects_zero_dimensions() {
    assert!(matches!(Context2d::new(0, 3), Err(FimError::Validation(_))));
}

#[test]
fn fill_rect_covers_whole_surface() {
    let mut ctx = Context2d::new(16, 8).unwrap();
    ctx.set_fill_style(Rgba8::rgb(0, 255, 0));
    ctx.fill_rect(Rect::new(0.0, 0.0, 16.0, 8.0));
    for (x, y) in [(0, 0), (15, 7), (8, 4)] {
        assert_eq!(ctx.get_pixel(x, y).unwrap(), Rgba8::rgb(0, 255, 0));
    }
}

#[test]
fn fill_rect_respects_bounds_and_transform() {
    let mut ctx = Context2d::new(32, 32).unwrap();
    ctx.set_fill_style(Rgba8::rgb(255, 0, 0));
    ctx.set_transform(Affine::translate((16.0, 16.0)));
    ctx.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0));

    assert_eq!(ctx.get_pixel(24, 24).unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(ctx.get_pixel(4, 4).unwrap(), Rgba8::TRANSPARENT);
    assert_eq!(ctx.get_pixel(24, 4).unwrap(), Rgba8::TRANSPARENT);
}

#[test]
fn later_fills_composite_over_earlier_ones() {
    let mut ctx = Context2d::new(8, 8).unwrap();
    ctx.set_fill_style(Rgba8::rgb(0, 0, 255));
    ctx.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    ctx.get_pixel(0, 0).unwrap();

    ctx.set_fill_style(Rgba8::new(255, 0, 0, 0));
    ctx.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    assert_eq!(ctx.get_pixel(4, 4).unwrap(), Rgba8::rgb(0, 0, 255));

    ctx.set_fill_style(Rgba8::rgb(255, 255, 0));
    ctx.fill_rect(Rect::new(0.0, 0.0, 4.0, 8.0));
    assert_eq!(ctx.get_pixel(1, 4).unwrap(), Rgba8::rgb(255, 255, 0));
    assert_eq!(ctx.get_pixel(6, 4).unwrap(), Rgba8::rgb(0, 0, 255));
}

#[test]
fn fill_path_triangle_hits_interior() {
    let mut ctx = Context2d::new(20, 20).unwrap();
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((20.0, 0.0));
    path.line_to((0.0, 20.0));
    path.close_path();
    ctx.set_fill_style(Rgba8::WHITE);
    ctx.fill_path(&path);

    assert_eq!(ctx.get_pixel(2, 2).unwrap(), Rgba8::WHITE);
    assert_eq!(ctx.get_pixel(18, 18).unwrap(), Rgba8::TRANSPARENT);
}

#[test]
fn put_and_get_image_data_roundtrip() {
    let mut ctx = Context2d::new(6, 4).unwrap();
    let mut src = RgbaBuffer::filled(3, 2, Rgba8::rgb(10, 20, 30)).unwrap();
    src.set_pixel(2, 1, Rgba8::rgb(40, 50, 60)).unwrap();
    ctx.put_image_data(&src, 2, 1).unwrap();

    let region = ctx.get_image_data(2, 1, 3, 2).unwrap();
    assert_eq!(region, src);
    assert_eq!(ctx.get_pixel(0, 0).unwrap(), Rgba8::TRANSPARENT);
}

#[test]
fn put_image_data_clips_and_commits_pending_draws_first() {
    let mut ctx = Context2d::new(4, 4).unwrap();
    ctx.set_fill_style(Rgba8::rgb(255, 0, 0));
    ctx.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));

    let src = RgbaBuffer::filled(4, 4, Rgba8::rgb(0, 255, 0)).unwrap();
    ctx.put_image_data(&src, 2, 2).unwrap();

    assert_eq!(ctx.get_pixel(0, 0).unwrap(), Rgba8::rgb(255, 0, 0));
    assert_eq!(ctx.get_pixel(3, 3).unwrap(), Rgba8::rgb(0, 255, 0));

    ctx.put_image_data(&src, 9, 9).unwrap();
}

#[test]
fn get_image_data_rejects_out_of_bounds_region() {
    let mut ctx = Context2d::new(4, 4).unwrap();
    assert!(ctx.get_image_data(2, 2, 3, 1).is_err());
    assert!(ctx.get_image_data(u32::MAX, 0, 2, 1).is_err());
    assert!(ctx.get_pixel(4, 0).is_err());
}

#[test]
fn clear_rect_and_clear_to() {
    let mut ctx = Context2d::new(4, 4).unwrap();
    ctx.clear_to(Rgba8::rgb(1, 2, 3));
    assert_eq!(ctx.get_pixel(3, 3).unwrap(), Rgba8::rgb(1, 2, 3));

    ctx.clear_rect(Rect::new(0.0, 0.0, 2.0, 4.0)).unwrap();
    assert_eq!(ctx.get_pixel(1, 2).unwrap(), Rgba8::TRANSPARENT);
    assert_eq!(ctx.get_pixel(2, 2).unwrap(), Rgba8::rgb(1, 2, 3));

    ctx.set_fill_style(Rgba8::WHITE);
    ctx.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
    ctx.clear_to(Rgba8::BLACK);
    assert_eq!(ctx.get_pixel(0, 0).unwrap(), Rgba8::BLACK);
}
