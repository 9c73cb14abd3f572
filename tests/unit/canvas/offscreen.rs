use super::*;
use crate::encode::codec::decode_image;
use crate::foundation::core::{Rect, Rgba8};
use crate::gl::program::GradientProgram;

#[test]
fn context_kind_names() {
    assert_eq!("2d".parse::<ContextKind>().unwrap(), ContextKind::TwoD);
    assert_eq!("webgl".parse::<ContextKind>().unwrap(), ContextKind::WebGl);
    for bad in ["webgl2", "bitmaprenderer", "2D", ""] {
        assert!(matches!(
            bad.parse::<ContextKind>(),
            Err(FimError::InvalidContextKind(_))
        ));
    }
    assert_eq!(ContextKind::WebGl.to_string(), "webgl");
    assert_eq!(
        serde_json::to_string(&ContextKind::TwoD).unwrap(),
        "\"2d\""
    );
}

#[test]
fn new_canvas_is_unbound() {
    let canvas = create(7, 9).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (7, 9));
    assert_eq!(canvas.context_kind(), None);
    assert!(matches!(create(0, 9), Err(FimError::Validation(_))));
}

#[test]
fn binding_is_exclusive() {
    let mut canvas = create(4, 4).unwrap();
    assert_eq!(
        canvas.get_context(ContextKind::TwoD).unwrap().kind(),
        ContextKind::TwoD
    );
    assert!(matches!(
        canvas.get_context(ContextKind::WebGl),
        Err(FimError::InvalidContextKind(_))
    ));
    assert!(matches!(
        canvas.get_context_by_name("webgl2"),
        Err(FimError::InvalidContextKind(_))
    ));
    assert_eq!(canvas.context_kind(), Some(ContextKind::TwoD));

    let mut gl = create(4, 4).unwrap();
    assert!(gl.context_webgl().is_ok());
    assert!(matches!(
        gl.context_2d(),
        Err(FimError::InvalidContextKind(_))
    ));
}

#[test]
fn mismatched_request_names_the_bound_kind() {
    let mut canvas = create(4, 4).unwrap();
    canvas.context_webgl().unwrap();
    let err = canvas.get_context(ContextKind::TwoD).unwrap_err();
    assert!(matches!(err, FimError::InvalidContextKind(_)));
    assert!(err.to_string().contains("bound to \"webgl\""));
    assert!(canvas.get_context(ContextKind::WebGl).is_ok());
}

#[test]
fn oversized_webgl_canvas_fails_to_bind() {
    let mut canvas = create(5000, 10).unwrap();
    assert!(matches!(
        canvas.get_context(ContextKind::WebGl),
        Err(FimError::Gl(_))
    ));
    assert_eq!(canvas.context_kind(), None);
    assert!(create(5000, 10).unwrap().context_2d().is_ok());
}

#[test]
fn unknown_name_leaves_canvas_unbound() {
    let mut canvas = create(4, 4).unwrap();
    assert!(canvas.get_context_by_name("bitmaprenderer").is_err());
    assert_eq!(canvas.context_kind(), None);
}

#[test]
fn repeated_2d_requests_share_the_backing() {
    let mut canvas = create(8, 8).unwrap();
    {
        let ctx = canvas.context_2d().unwrap();
        ctx.set_fill_style(Rgba8::rgb(0, 0, 255));
        ctx.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    }
    let ctx = canvas
        .get_context_by_name("2d")
        .unwrap()
        .into_2d()
        .unwrap();
    assert_eq!(ctx.get_pixel(3, 3).unwrap(), Rgba8::rgb(0, 0, 255));
}

#[test]
fn encoding_requires_a_context() {
    let mut canvas = create(4, 4).unwrap();
    assert!(matches!(
        canvas.convert_to_buffer(None),
        Err(FimError::NoActiveContext)
    ));
    assert!(matches!(
        canvas.convert_to_blob(None),
        Err(FimError::NoActiveContext)
    ));
    assert!(matches!(
        canvas.to_rgba_buffer(),
        Err(FimError::NoActiveContext)
    ));
}

#[test]
fn webgl_readback_is_top_down() {
    let mut canvas = create(16, 8).unwrap();
    canvas
        .context_webgl()
        .unwrap()
        .draw(&GradientProgram, &[], None)
        .unwrap();
    let pixels = canvas.to_rgba_buffer().unwrap();
    assert!(pixels.get_pixel(15, 0).unwrap().r > 200);
    assert!(pixels.get_pixel(0, 7).unwrap().r < 10);

    let png = canvas.convert_to_buffer(None).unwrap();
    assert_eq!(decode_image(&png).unwrap(), pixels);
}

#[test]
fn blob_carries_mime() {
    let mut canvas = create(2, 2).unwrap();
    canvas.context_2d().unwrap().clear_to(Rgba8::WHITE);
    assert_eq!(canvas.convert_to_blob(None).unwrap().mime_type(), "image/png");
    let jpeg = canvas
        .convert_to_blob(Some(&EncodeOptions::jpeg(0.5)))
        .unwrap();
    assert_eq!(jpeg.mime_type(), "image/jpeg");
    assert_eq!(&jpeg.bytes()[..3], &[0xFF, 0xD8, 0xFF]);
}

#[test]
fn dispose_is_idempotent_and_blocks_readback() {
    let mut canvas = create(4, 4).unwrap();
    canvas.context_webgl().unwrap();
    canvas.dispose();
    canvas.dispose();
    assert!(matches!(
        canvas.convert_to_buffer(None),
        Err(FimError::Gl(_))
    ));
    assert!(canvas.context_webgl().unwrap().is_context_lost());

    let mut flat = create(4, 4).unwrap();
    flat.context_2d().unwrap();
    flat.dispose();
    assert!(flat.convert_to_buffer(None).is_ok());
}

#[test]
fn bitmap_transfer_is_not_implemented() {
    let mut canvas = create(4, 4).unwrap();
    assert!(matches!(
        canvas.transfer_to_image_bitmap(),
        Err(FimError::NotImplemented(_))
    ));
}

#[test]
fn event_target_is_inert() {
    use crate::canvas::events::CanvasEvent;

    let mut canvas = create(4, 4).unwrap();
    canvas.add_event_listener("contextlost", Box::new(|_: &CanvasEvent| panic!("never delivered")));
    assert!(canvas.dispatch_event(&CanvasEvent::new("contextlost")));
    canvas.remove_event_listener("contextlost");
}

#[test]
fn factory_size_mismatch_is_rejected() {
    let factory = |_w: u32, _h: u32| -> FimResult<Box<dyn GlDevice>> {
        Ok(Box::new(crate::gl::software::SoftwareGl::new(1, 1)?))
    };
    let mut canvas = VirtualOffscreenCanvas::with_gl_factory(4, 4, Arc::new(factory)).unwrap();
    assert!(matches!(canvas.context_webgl(), Err(FimError::Gl(_))));
    assert_eq!(canvas.context_kind(), None);
}
