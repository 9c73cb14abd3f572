use super::*;
use crate::encode::codec::decode_image;
use crate::fim::session::Fim;

#[test]
fn creates_fills_and_disposes() {
    let fim = Fim::new();
    let mut canvas = fim
        .create_canvas(100, 200, Some(Rgba8::rgb(255, 0, 0)))
        .unwrap();
    assert_eq!((canvas.width(), canvas.height()), (100, 200));
    assert_eq!(canvas.get_pixel(50, 50).unwrap(), Rgba8::rgb(255, 0, 0));

    canvas.fill(Rgba8::rgb(0, 255, 0)).unwrap();
    assert_eq!(canvas.get_pixel(50, 50).unwrap(), Rgba8::rgb(0, 255, 0));

    canvas.dispose();
    canvas.dispose();
}

#[test]
fn set_pixel_and_bounds() {
    let fim = Fim::new();
    let mut canvas = fim.create_canvas(4, 4, None).unwrap();
    canvas.set_pixel(3, 0, Rgba8::new(10, 20, 30, 255)).unwrap();
    assert_eq!(canvas.get_pixel(3, 0).unwrap(), Rgba8::new(10, 20, 30, 255));
    assert_eq!(canvas.get_pixel(0, 3).unwrap(), Rgba8::TRANSPARENT);
    assert!(matches!(
        canvas.set_pixel(4, 0, Rgba8::WHITE),
        Err(FimError::Validation(_))
    ));
    assert!(canvas.get_pixel(0, 4).is_err());
}

#[test]
fn draw_rect_composites() {
    let fim = Fim::new();
    let mut canvas = fim.create_canvas(10, 10, Some(Rgba8::BLACK)).unwrap();
    canvas
        .draw_rect(Rect::new(5.0, 0.0, 10.0, 10.0), Rgba8::WHITE)
        .unwrap();
    assert_eq!(canvas.get_pixel(2, 5).unwrap(), Rgba8::BLACK);
    assert_eq!(canvas.get_pixel(7, 5).unwrap(), Rgba8::WHITE);
}

#[test]
fn copies_between_canvases_and_buffers() {
    let fim = Fim::new();
    let mut src = fim.create_canvas(3, 3, Some(Rgba8::rgb(1, 2, 3))).unwrap();
    src.set_pixel(1, 1, Rgba8::rgb(9, 9, 9)).unwrap();

    let mut dst = fim.create_canvas(3, 3, None).unwrap();
    dst.copy_from_canvas(&mut src).unwrap();
    assert_eq!(dst.to_rgba_buffer().unwrap(), src.to_rgba_buffer().unwrap());

    let mut small = fim.create_canvas(2, 2, None).unwrap();
    assert!(matches!(
        small.copy_from_canvas(&mut src),
        Err(FimError::Validation(_))
    ));

    let buf = fim.create_rgba_buffer(2, 2, Some(Rgba8::WHITE)).unwrap();
    small.copy_from_buffer(&buf).unwrap();
    assert_eq!(small.get_pixel(1, 1).unwrap(), Rgba8::WHITE);
}

#[test]
fn copy_from_gl_keeps_orientation() {
    let fim = Fim::new();
    let mut gl = fim.create_gl_canvas(8, 8, Some(Rgba8::BLACK)).unwrap();
    let top = crate::gl::program::ShaderFn::new(
        "top-row",
        |f: &crate::gl::program::Fragment, _: &[crate::gl::program::Sampler<'_>]| {
            if f.pixel[1] == 7 {
                [1.0, 1.0, 1.0, 1.0]
            } else {
                [0.0, 0.0, 0.0, 1.0]
            }
        },
    );
    gl.execute(&top, &[]).unwrap();

    let mut canvas = fim.create_canvas(8, 8, None).unwrap();
    canvas.copy_from_gl(&mut gl).unwrap();
    assert_eq!(canvas.get_pixel(4, 0).unwrap(), Rgba8::WHITE);
    assert_eq!(canvas.get_pixel(4, 7).unwrap(), Rgba8::BLACK);
}

#[test]
fn duplicate_is_independent() {
    let fim = Fim::new();
    let mut canvas = fim.create_canvas(5, 5, Some(Rgba8::rgb(0, 0, 255))).unwrap();
    let mut dupe = canvas.duplicate().unwrap();
    assert_eq!(dupe.get_pixel(4, 4).unwrap(), Rgba8::rgb(0, 0, 255));

    canvas.fill(Rgba8::WHITE).unwrap();
    assert_eq!(dupe.get_pixel(4, 4).unwrap(), Rgba8::rgb(0, 0, 255));
}

#[test]
fn exports_png_and_jpeg() {
    let fim = Fim::new();
    let mut canvas = fim
        .create_canvas(100, 200, Some(Rgba8::rgb(255, 0, 0)))
        .unwrap();

    let png = canvas.to_png().unwrap();
    assert_eq!(&png[..4], &[0x89, 0x50, 0x4E, 0x47]);
    assert_eq!(
        decode_image(&png).unwrap().get_pixel(50, 50).unwrap(),
        Rgba8::rgb(255, 0, 0)
    );

    let jpeg = canvas.to_jpeg(None).unwrap();
    assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
    let back = fim.create_canvas_from_jpeg(&jpeg).unwrap();
    assert_eq!((back.width(), back.height()), (100, 200));

    assert!(matches!(
        canvas.to_jpeg(Some(2.0)),
        Err(FimError::UnsupportedFormat(_))
    ));
}
