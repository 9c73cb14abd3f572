//! Dual-mode virtual offscreen canvas.
//!
//! A canvas starts unbound and binds to either a 2D raster context or a WebGL device on the first
//! context request. The binding is permanent; encoding reads back whichever surface is bound.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::buffer::rgba::RgbaBuffer;
use crate::canvas::context2d::Context2d;
use crate::canvas::events::EventTarget;
use crate::encode::codec::encode_rgba;
use crate::encode::format::{Blob, EncodeOptions};
use crate::foundation::core::Size;
use crate::foundation::error::{FimError, FimResult};
use crate::gl::backing::GlBacking;
use crate::gl::device::{GlContextFactory, GlDevice};
use crate::gl::software::SoftwareGlFactory;

/// Rendering context kinds a canvas can bind to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// `"2d"`: raster drawing context.
    TwoD,
    /// `"webgl"`: WebGL-style device.
    WebGl,
}

impl ContextKind {
    /// Context name as passed to `getContext`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoD => "2d",
            Self::WebGl => "webgl",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextKind {
    type Err = FimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2d" => Ok(Self::TwoD),
            "webgl" => Ok(Self::WebGl),
            other => Err(FimError::invalid_context_kind(format!(
                "\"{other}\" is not supported (expected \"2d\" or \"webgl\")"
            ))),
        }
    }
}

impl serde::Serialize for ContextKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for ContextKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Borrowed backing context returned by [`VirtualOffscreenCanvas::get_context`].
pub enum RenderingContext<'a> {
    /// 2D raster context.
    TwoD(&'a mut Context2d),
    /// WebGL device.
    WebGl(&'a mut dyn GlDevice),
}

impl<'a> RenderingContext<'a> {
    /// Kind of the borrowed context.
    pub fn kind(&self) -> ContextKind {
        match self {
            Self::TwoD(_) => ContextKind::TwoD,
            Self::WebGl(_) => ContextKind::WebGl,
        }
    }

    /// The 2D context, if that is what this is.
    pub fn into_2d(self) -> Option<&'a mut Context2d> {
        match self {
            Self::TwoD(ctx) => Some(ctx),
            Self::WebGl(_) => None,
        }
    }

    /// The WebGL device, if that is what this is.
    pub fn into_webgl(self) -> Option<&'a mut dyn GlDevice> {
        match self {
            Self::WebGl(device) => Some(device),
            Self::TwoD(_) => None,
        }
    }
}

impl fmt::Debug for RenderingContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwoD(ctx) => f.debug_tuple("TwoD").field(ctx).finish(),
            Self::WebGl(device) => {
                let (w, h) = device.drawing_buffer_size();
                f.debug_struct("WebGl")
                    .field("width", &w)
                    .field("height", &h)
                    .finish()
            }
        }
    }
}

enum CanvasState {
    Unbound,
    TwoD(Context2d),
    WebGl(GlBacking),
}

impl CanvasState {
    fn kind(&self) -> Option<ContextKind> {
        match self {
            Self::Unbound => None,
            Self::TwoD(_) => Some(ContextKind::TwoD),
            Self::WebGl(_) => Some(ContextKind::WebGl),
        }
    }
}

/// A fixed-size offscreen surface that lazily binds a 2D or WebGL backing.
pub struct VirtualOffscreenCanvas {
    size: Size,
    state: CanvasState,
    gl_factory: Arc<dyn GlContextFactory>,
}

impl fmt::Debug for VirtualOffscreenCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualOffscreenCanvas")
            .field("width", &self.size.width)
            .field("height", &self.size.height)
            .field("context", &self.state.kind())
            .finish()
    }
}

/// Create an unbound canvas whose WebGL contexts come from the software device.
pub fn create(width: u32, height: u32) -> FimResult<VirtualOffscreenCanvas> {
    VirtualOffscreenCanvas::new(width, height)
}

impl VirtualOffscreenCanvas {
    /// Create an unbound canvas. Nothing is allocated until the first context request.
    pub fn new(width: u32, height: u32) -> FimResult<Self> {
        Self::with_gl_factory(width, height, Arc::new(SoftwareGlFactory::default()))
    }

    /// Create an unbound canvas that materializes WebGL contexts through `gl_factory`.
    pub fn with_gl_factory(
        width: u32,
        height: u32,
        gl_factory: Arc<dyn GlContextFactory>,
    ) -> FimResult<Self> {
        Ok(Self {
            size: Size::new(width, height)?,
            state: CanvasState::Unbound,
            gl_factory,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Both dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// A new unbound canvas sharing this canvas's WebGL factory.
    pub fn sibling(&self, width: u32, height: u32) -> FimResult<Self> {
        Self::with_gl_factory(width, height, Arc::clone(&self.gl_factory))
    }

    /// Kind the canvas is bound to, or `None` before the first context request.
    pub fn context_kind(&self) -> Option<ContextKind> {
        self.state.kind()
    }

    /// Return the backing context of `kind`, creating it on first use.
    ///
    /// Requesting a kind other than the one already bound fails with
    /// [`FimError::InvalidContextKind`].
    pub fn get_context(&mut self, kind: ContextKind) -> FimResult<RenderingContext<'_>> {
        if matches!(self.state, CanvasState::Unbound) {
            self.state = self.materialize(kind)?;
        }
        let bound = self.state.kind();
        match &mut self.state {
            CanvasState::TwoD(ctx) if kind == ContextKind::TwoD => Ok(RenderingContext::TwoD(ctx)),
            CanvasState::WebGl(backing) if kind == ContextKind::WebGl => {
                Ok(RenderingContext::WebGl(backing.device()))
            }
            _ => Err(FimError::invalid_context_kind(format!(
                "canvas is bound to \"{}\", cannot create a \"{kind}\" context",
                bound.map_or("nothing", ContextKind::as_str)
            ))),
        }
    }

    /// [`VirtualOffscreenCanvas::get_context`] with the context named as a string.
    pub fn get_context_by_name(&mut self, name: &str) -> FimResult<RenderingContext<'_>> {
        let kind = name.parse()?;
        self.get_context(kind)
    }

    /// The 2D context, creating it on first use.
    pub fn context_2d(&mut self) -> FimResult<&mut Context2d> {
        match self.get_context(ContextKind::TwoD)? {
            RenderingContext::TwoD(ctx) => Ok(ctx),
            RenderingContext::WebGl(_) => Err(FimError::invalid_context_kind("expected 2d")),
        }
    }

    /// The WebGL device, creating it on first use.
    pub fn context_webgl(&mut self) -> FimResult<&mut dyn GlDevice> {
        match self.get_context(ContextKind::WebGl)? {
            RenderingContext::WebGl(device) => Ok(device),
            RenderingContext::TwoD(_) => Err(FimError::invalid_context_kind("expected webgl")),
        }
    }

    /// Read the bound surface as straight-alpha RGBA, top row first.
    ///
    /// WebGL readback is bottom-up and is flipped in place before returning.
    pub fn to_rgba_buffer(&mut self) -> FimResult<RgbaBuffer> {
        match &mut self.state {
            CanvasState::Unbound => Err(FimError::NoActiveContext),
            CanvasState::TwoD(ctx) => ctx.image_data(),
            CanvasState::WebGl(backing) => read_top_down(backing.live_device()?, self.size),
        }
    }

    /// Encode the bound surface. `None` encodes PNG.
    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(width = self.size.width, height = self.size.height)
    )]
    pub fn convert_to_buffer(&mut self, options: Option<&EncodeOptions>) -> FimResult<Vec<u8>> {
        let opts = options.copied().unwrap_or_default();
        match &mut self.state {
            CanvasState::Unbound => Err(FimError::NoActiveContext),
            CanvasState::TwoD(ctx) => encode_surface(ctx, &opts),
            CanvasState::WebGl(backing) => {
                let pixels = read_top_down(backing.live_device()?, self.size)?;
                let mut surface = Context2d::new(self.size.width, self.size.height)?;
                surface.put_image_data(&pixels, 0, 0)?;
                encode_surface(&mut surface, &opts)
            }
        }
    }

    /// [`VirtualOffscreenCanvas::convert_to_buffer`] tagged with its MIME type.
    pub fn convert_to_blob(&mut self, options: Option<&EncodeOptions>) -> FimResult<Blob> {
        let opts = options.copied().unwrap_or_default();
        let bytes = self.convert_to_buffer(Some(&opts))?;
        Ok(Blob::new(opts.format, bytes))
    }

    /// Release the WebGL backing. Safe to call any number of times; 2D canvases are untouched.
    pub fn dispose(&mut self) {
        if let CanvasState::WebGl(backing) = &mut self.state {
            backing.release();
        }
    }

    /// Zero-copy bitmap transfer is not emulated; always fails with
    /// [`FimError::NotImplemented`].
    pub fn transfer_to_image_bitmap(&mut self) -> FimResult<RgbaBuffer> {
        Err(FimError::not_implemented(
            "transferToImageBitmap is not supported by offscreen canvas emulation",
        ))
    }

    fn materialize(&self, kind: ContextKind) -> FimResult<CanvasState> {
        let Size { width, height } = self.size;
        let state = match kind {
            ContextKind::TwoD => CanvasState::TwoD(Context2d::new(width, height)?),
            ContextKind::WebGl => {
                let device = self.gl_factory.create_context(width, height)?;
                if device.drawing_buffer_size() != (width, height) {
                    return Err(FimError::gl(format!(
                        "factory returned a {:?} drawing buffer for a {width}x{height} canvas",
                        device.drawing_buffer_size()
                    )));
                }
                CanvasState::WebGl(GlBacking::new(device))
            }
        };
        tracing::debug!(%kind, width, height, "materialized canvas backing");
        Ok(state)
    }
}

impl EventTarget for VirtualOffscreenCanvas {}

fn read_top_down(device: &mut dyn GlDevice, size: Size) -> FimResult<RgbaBuffer> {
    let mut pixels = RgbaBuffer::new(size.width, size.height)?;
    device.read_pixels(0, 0, size.width, size.height, pixels.as_bytes_mut())?;
    pixels.flip_vertical();
    Ok(pixels)
}

fn encode_surface(ctx: &mut Context2d, opts: &EncodeOptions) -> FimResult<Vec<u8>> {
    let pixels = ctx.image_data()?;
    encode_rgba(&pixels, opts)
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/offscreen.rs"]
mod tests;
