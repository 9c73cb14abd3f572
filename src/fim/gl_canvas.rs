use std::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::rgba::RgbaBuffer;
use crate::canvas::offscreen::VirtualOffscreenCanvas;
use crate::encode::format::EncodeOptions;
use crate::fim::texture::{GlTexture, TextureFlags, TextureSource};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{FimError, FimResult};
use crate::gl::device::{GlDevice, TextureId};
use crate::gl::program::FragmentProgram;

static NEXT_CANVAS_ID: AtomicU64 = AtomicU64::new(1);

/// A WebGL canvas backed by a [`VirtualOffscreenCanvas`] bound to its WebGL context.
///
/// Pixel coordinates in this API are top-left based, like [`ImageCanvas`](crate::ImageCanvas);
/// the conversion to the device's bottom-left origin happens here.
#[derive(Debug)]
pub struct GlCanvas {
    canvas: VirtualOffscreenCanvas,
    id: u64,
    jpeg_quality: f64,
}

impl GlCanvas {
    pub(crate) fn new(
        mut canvas: VirtualOffscreenCanvas,
        initial_color: Option<Rgba8>,
        jpeg_quality: f64,
    ) -> FimResult<Self> {
        canvas.context_webgl()?;
        let mut out = Self {
            canvas,
            id: NEXT_CANVAS_ID.fetch_add(1, Ordering::Relaxed),
            jpeg_quality,
        };
        if let Some(color) = initial_color {
            out.fill(color)?;
        }
        Ok(out)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// The backing offscreen canvas.
    pub fn offscreen(&mut self) -> &mut VirtualOffscreenCanvas {
        &mut self.canvas
    }

    /// The WebGL device.
    pub fn device(&mut self) -> FimResult<&mut dyn GlDevice> {
        self.canvas.context_webgl()
    }

    /// Clear the framebuffer to `color`.
    pub fn fill(&mut self, color: Rgba8) -> FimResult<()> {
        let device = self.device()?;
        device.clear_color(color.to_f32())?;
        device.clear(None)
    }

    /// Pixel at `(x, y)`, top-left origin.
    pub fn get_pixel(&mut self, x: u32, y: u32) -> FimResult<Rgba8> {
        let (w, h) = (self.width(), self.height());
        if x >= w || y >= h {
            return Err(FimError::validation(format!(
                "pixel ({x}, {y}) outside {w}x{h} canvas"
            )));
        }
        let mut px = [0u8; 4];
        self.device()?.read_pixels(x, h - 1 - y, 1, 1, &mut px)?;
        Ok(Rgba8::from_array(px))
    }

    /// Run `program` over the whole framebuffer.
    pub fn execute(&mut self, program: &dyn FragmentProgram, inputs: &[&GlTexture]) -> FimResult<()> {
        let ids = self.input_ids(inputs)?;
        self.device()?.draw(program, &ids, None)
    }

    /// Run `program` with `target` as the render target.
    pub fn execute_to_texture(
        &mut self,
        program: &dyn FragmentProgram,
        inputs: &[&GlTexture],
        target: &GlTexture,
    ) -> FimResult<()> {
        self.check_writable(target)?;
        let ids = self.input_ids(inputs)?;
        self.device()?.draw(program, &ids, Some(target.id))
    }

    /// Allocate a transparent texture. Dimensions default to the canvas size.
    pub fn create_texture(
        &mut self,
        width: Option<u32>,
        height: Option<u32>,
        flags: TextureFlags,
    ) -> FimResult<GlTexture> {
        let width = width.unwrap_or(self.width());
        let height = height.unwrap_or(self.height());
        let id = self.device()?.create_texture(width, height, flags.filter())?;
        tracing::trace!(id = id.raw(), width, height, ?flags, "created texture");
        Ok(GlTexture {
            id,
            owner: self.id,
            width,
            height,
            flags,
        })
    }

    /// Create an input-only texture holding a copy of `source`.
    pub fn create_texture_from(
        &mut self,
        mut source: TextureSource<'_>,
        extra_flags: TextureFlags,
    ) -> FimResult<GlTexture> {
        let pixels = source.to_rgba_buffer()?;
        let texture = self.create_texture(
            Some(pixels.width()),
            Some(pixels.height()),
            TextureFlags::INPUT_ONLY | extra_flags,
        )?;
        self.upload(&texture, &pixels)?;
        Ok(texture)
    }

    /// Replace the contents of `texture` with `source`. Sizes must match.
    pub fn copy_to_texture(
        &mut self,
        texture: &GlTexture,
        mut source: TextureSource<'_>,
    ) -> FimResult<()> {
        let pixels = source.to_rgba_buffer()?;
        self.upload(texture, &pixels)
    }

    /// Clear `texture` to `color`.
    pub fn fill_texture(&mut self, texture: &GlTexture, color: Rgba8) -> FimResult<()> {
        self.check_writable(texture)?;
        let device = self.device()?;
        device.clear_color(color.to_f32())?;
        device.clear(Some(texture.id))
    }

    /// Free `texture` now rather than with the device.
    pub fn delete_texture(&mut self, texture: GlTexture) -> FimResult<()> {
        self.check_owner(&texture)?;
        self.device()?.delete_texture(texture.id)
    }

    /// Framebuffer contents, top row first.
    pub fn to_rgba_buffer(&mut self) -> FimResult<RgbaBuffer> {
        self.canvas.to_rgba_buffer()
    }

    /// Encode the framebuffer as PNG.
    pub fn to_png(&mut self) -> FimResult<Vec<u8>> {
        self.canvas.convert_to_buffer(Some(&EncodeOptions::png()))
    }

    /// Encode the framebuffer as JPEG. `None` uses the session's default quality.
    pub fn to_jpeg(&mut self, quality: Option<f64>) -> FimResult<Vec<u8>> {
        let opts = EncodeOptions::jpeg(quality.unwrap_or(self.jpeg_quality));
        self.canvas.convert_to_buffer(Some(&opts))
    }

    /// Destroy the WebGL device. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.canvas.dispose();
    }

    fn upload(&mut self, texture: &GlTexture, pixels: &RgbaBuffer) -> FimResult<()> {
        self.check_owner(texture)?;
        if (pixels.width(), pixels.height()) != (texture.width, texture.height) {
            return Err(FimError::validation(format!(
                "source is {}x{}, texture is {}x{}; cropping and rescaling are not supported",
                pixels.width(),
                pixels.height(),
                texture.width,
                texture.height
            )));
        }
        self.device()?.tex_image_2d(texture.id, pixels, true)
    }

    fn input_ids(&self, inputs: &[&GlTexture]) -> FimResult<Vec<TextureId>> {
        inputs
            .iter()
            .map(|t| self.check_owner(t).map(|()| t.id))
            .collect()
    }

    fn check_owner(&self, texture: &GlTexture) -> FimResult<()> {
        if texture.owner != self.id {
            return Err(FimError::validation(format!(
                "texture {} belongs to another canvas",
                texture.id.raw()
            )));
        }
        Ok(())
    }

    fn check_writable(&self, texture: &GlTexture) -> FimResult<()> {
        self.check_owner(texture)?;
        if texture.flags.contains(TextureFlags::INPUT_ONLY) {
            return Err(FimError::validation(format!(
                "texture {} is input-only and cannot be rendered to",
                texture.id.raw()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fim/gl_canvas.rs"]
mod tests;
