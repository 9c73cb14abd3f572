//! The contract a native WebGL-style backend must satisfy.
//!
//! Devices follow GL conventions: the origin is the bottom-left corner, `read_pixels` returns
//! rows bottom-up and texture row 0 is the bottom row.

use crate::buffer::rgba::RgbaBuffer;
use crate::foundation::error::FimResult;
use crate::gl::program::FragmentProgram;

/// Name of the extension that exposes an explicit context destroy hook.
pub const DESTROY_CONTEXT_EXTENSION: &str = "STACKGL_destroy_context";

/// Opaque handle to a texture owned by a [`GlDevice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) u32);

impl TextureId {
    /// Raw handle value.
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Texture sampling filter for minification and magnification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    /// Nearest texel.
    #[default]
    Nearest,
    /// Bilinear interpolation of the four nearest texels.
    Linear,
}

/// Static description of a device, as reported by `getParameter` / `getSupportedExtensions`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DeviceInfo {
    /// `VENDOR` string.
    pub vendor: String,
    /// `RENDERER` string.
    pub renderer: String,
    /// `VERSION` string.
    pub version: String,
    /// `SHADING_LANGUAGE_VERSION` string.
    pub shading_language_version: String,
    /// `MAX_TEXTURE_SIZE`.
    pub max_texture_size: u32,
    /// `MAX_RENDERBUFFER_SIZE`.
    pub max_renderbuffer_size: u32,
    /// Supported extension names.
    pub extensions: Vec<String>,
}

impl DeviceInfo {
    /// Whether `name` is listed among the supported extensions.
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }
}

/// Explicit destroy hook. After `destroy` the device must reject further work.
pub trait DestroyContext {
    /// Release every resource held by the device.
    fn destroy(&mut self);
}

/// A WebGL-style rendering device bound to a fixed-size default framebuffer.
pub trait GlDevice: Send {
    /// Size of the default framebuffer.
    fn drawing_buffer_size(&self) -> (u32, u32);

    /// Vendor, limits and extensions.
    fn info(&self) -> DeviceInfo;

    /// `true` once the device has been destroyed or lost.
    fn is_context_lost(&self) -> bool;

    /// Set the color used by [`GlDevice::clear`] (straight alpha, `0..=1`).
    fn clear_color(&mut self, rgba: [f32; 4]) -> FimResult<()>;

    /// Clear the default framebuffer, or `target` when given, to the clear color.
    fn clear(&mut self, target: Option<TextureId>) -> FimResult<()>;

    /// Read an RGBA8 rectangle of the default framebuffer into `out`.
    ///
    /// `(x, y)` is measured from the bottom-left corner and `out` receives rows bottom-up.
    /// `out.len()` must equal `width * height * 4`.
    fn read_pixels(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        out: &mut [u8],
    ) -> FimResult<()>;

    /// Allocate a transparent texture.
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        filter: TextureFilter,
    ) -> FimResult<TextureId>;

    /// Replace the contents of `texture` with `pixels` (top row first).
    ///
    /// Without `flip_y` the first source row lands in texture row 0 (the bottom), which is
    /// `UNPACK_FLIP_Y_WEBGL = false`.
    fn tex_image_2d(
        &mut self,
        texture: TextureId,
        pixels: &RgbaBuffer,
        flip_y: bool,
    ) -> FimResult<()>;

    /// Free `texture`. Unknown handles are an error.
    fn delete_texture(&mut self, texture: TextureId) -> FimResult<()>;

    /// Run `program` over every pixel of the target, sampling `inputs` in order.
    ///
    /// `target` of `None` draws into the default framebuffer. A texture may not be both an input
    /// and the target.
    fn draw(
        &mut self,
        program: &dyn FragmentProgram,
        inputs: &[TextureId],
        target: Option<TextureId>,
    ) -> FimResult<()>;

    /// The [`DESTROY_CONTEXT_EXTENSION`] hook, if the device exposes one.
    fn destroy_context_extension(&mut self) -> Option<&mut dyn DestroyContext>;
}

/// Materializes devices for canvases that bind a WebGL context.
pub trait GlContextFactory: Send + Sync {
    /// Create a device whose default framebuffer is `width × height`.
    fn create_context(&self, width: u32, height: u32) -> FimResult<Box<dyn GlDevice>>;
}

impl<F> GlContextFactory for F
where
    F: Fn(u32, u32) -> FimResult<Box<dyn GlDevice>> + Send + Sync,
{
    fn create_context(&self, width: u32, height: u32) -> FimResult<Box<dyn GlDevice>> {
        self(width, height)
    }
}
