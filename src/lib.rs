//! `fim-headless` runs browser-style image manipulation code in a server process.
//!
//! The core type is [`VirtualOffscreenCanvas`], an emulation of the browser's `OffscreenCanvas`:
//! a fixed-size surface that binds lazily to either a 2D raster context ([`Context2d`]) or a
//! WebGL-style device ([`GlDevice`]) and encodes whatever was rendered to PNG or JPEG.
//!
//! # Layers
//!
//! 1. **Surfaces**: [`Context2d`] (vector fills on a `vello_cpu` raster) and [`GlDevice`]
//!    implementations such as [`SoftwareGl`], created through a [`GlContextFactory`].
//! 2. **Canvas**: [`VirtualOffscreenCanvas`] owns exactly one backing, enforces that a canvas is
//!    either 2D or WebGL for its whole life, and releases WebGL devices through [`GlBacking`].
//! 3. **Image library**: [`Fim`] creates [`ImageCanvas`] and [`GlCanvas`] wrappers, textures and
//!    RGBA buffers, and imports PNG/JPEG bytes.
//!
//! # Orientation
//!
//! Everything public is top-left based except the raw [`GlDevice`] API, which keeps GL's
//! bottom-left origin. WebGL readback is flipped in place before encoding.
//!
//! ```no_run
//! use fim_headless::{EncodeOptions, Rect, Rgba8, create};
//!
//! # fn main() -> fim_headless::FimResult<()> {
//! let mut canvas = create(100, 200)?;
//! let ctx = canvas.context_2d()?;
//! ctx.set_fill_style(Rgba8::rgb(255, 0, 0));
//! ctx.fill_rect(Rect::new(0.0, 0.0, 100.0, 200.0));
//! let jpeg = canvas.convert_to_buffer(Some(&EncodeOptions::jpeg(0.95)))?;
//! assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buffer;
mod canvas;
mod encode;
mod fim;
mod foundation;
mod gl;

pub use buffer::rgba::{RgbaBuffer, flip_rows_in_place};
pub use canvas::context2d::Context2d;
pub use canvas::events::{CanvasEvent, EventListener, EventTarget};
pub use canvas::offscreen::{ContextKind, RenderingContext, VirtualOffscreenCanvas, create};
pub use encode::codec::{decode_image, encode_rgba, sniff_mime};
pub use encode::format::{Blob, DEFAULT_JPEG_QUALITY, EncodeOptions, ImageMime};
pub use fim::capabilities::GlCapabilities;
pub use fim::gl_canvas::GlCanvas;
pub use fim::image_canvas::ImageCanvas;
pub use fim::session::{Fim, FimOpts, JPEG_QUALITY_ENV, MAX_TEXTURE_SIZE_ENV};
pub use fim::texture::{GlTexture, TextureFlags, TextureSource};
pub use foundation::core::{Affine, BezPath, MAX_CANVAS_DIMENSION, Point, Rect, Rgba8, Size};
pub use foundation::error::{FimError, FimResult};
pub use gl::backing::GlBacking;
pub use gl::device::{
    DESTROY_CONTEXT_EXTENSION, DestroyContext, DeviceInfo, GlContextFactory, GlDevice,
    TextureFilter, TextureId,
};
pub use gl::program::{
    CopyProgram, FillProgram, Fragment, FragmentProgram, GradientProgram, Sampler, ShaderFn,
};
pub use gl::software::{DEFAULT_MAX_TEXTURE_SIZE, SoftwareGl, SoftwareGlFactory};
