use crate::buffer::rgba::RgbaBuffer;
use crate::canvas::context2d::Context2d;
use crate::canvas::offscreen::VirtualOffscreenCanvas;
use crate::encode::format::EncodeOptions;
use crate::fim::gl_canvas::GlCanvas;
use crate::foundation::core::{Rect, Rgba8};
use crate::foundation::error::{FimError, FimResult};

/// A 2D image canvas backed by a [`VirtualOffscreenCanvas`] bound to its 2D context.
#[derive(Debug)]
pub struct ImageCanvas {
    canvas: VirtualOffscreenCanvas,
    jpeg_quality: f64,
}

impl ImageCanvas {
    pub(crate) fn new(
        mut canvas: VirtualOffscreenCanvas,
        initial_color: Option<Rgba8>,
        jpeg_quality: f64,
    ) -> FimResult<Self> {
        let ctx = canvas.context_2d()?;
        if let Some(color) = initial_color {
            ctx.clear_to(color);
        }
        Ok(Self {
            canvas,
            jpeg_quality,
        })
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

    /// The 2D drawing context.
    pub fn context(&mut self) -> FimResult<&mut Context2d> {
        self.canvas.context_2d()
    }

    /// Replace every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) -> FimResult<()> {
        self.context()?.clear_to(color);
        Ok(())
    }

    /// Pixel at `(x, y)`, top-left origin.
    pub fn get_pixel(&mut self, x: u32, y: u32) -> FimResult<Rgba8> {
        self.context()?.get_pixel(x, y)
    }

    /// Overwrite the pixel at `(x, y)`, top-left origin.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) -> FimResult<()> {
        if x >= self.width() || y >= self.height() {
            return Err(FimError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} canvas",
                self.width(),
                self.height()
            )));
        }
        let px = RgbaBuffer::filled(1, 1, color)?;
        self.context()?.put_image_data(&px, x, y)
    }

    /// Composite a `color` rectangle over the canvas.
    pub fn draw_rect(&mut self, rect: Rect, color: Rgba8) -> FimResult<()> {
        let ctx = self.context()?;
        ctx.set_fill_style(color);
        ctx.fill_rect(rect);
        ctx.flush()
    }

    /// Replace the contents with `pixels`, which must match the canvas size.
    pub fn copy_from_buffer(&mut self, pixels: &RgbaBuffer) -> FimResult<()> {
        self.ensure_same_size(pixels.width(), pixels.height())?;
        self.context()?.put_image_data(pixels, 0, 0)
    }

    /// Replace the contents with those of another 2D canvas of the same size.
    pub fn copy_from_canvas(&mut self, src: &mut ImageCanvas) -> FimResult<()> {
        let pixels = src.to_rgba_buffer()?;
        self.copy_from_buffer(&pixels)
    }

    /// Replace the contents with the framebuffer of a WebGL canvas of the same size.
    pub fn copy_from_gl(&mut self, src: &mut GlCanvas) -> FimResult<()> {
        let pixels = src.to_rgba_buffer()?;
        self.copy_from_buffer(&pixels)
    }

    /// Current contents as straight-alpha RGBA.
    pub fn to_rgba_buffer(&mut self) -> FimResult<RgbaBuffer> {
        self.canvas.to_rgba_buffer()
    }

    /// A new canvas of the same size and contents, sharing the same GL factory.
    pub fn duplicate(&mut self) -> FimResult<ImageCanvas> {
        let pixels = self.to_rgba_buffer()?;
        let sibling = self.canvas.sibling(self.width(), self.height())?;
        let mut dupe = ImageCanvas::new(sibling, None, self.jpeg_quality)?;
        dupe.copy_from_buffer(&pixels)?;
        Ok(dupe)
    }

    /// Encode as PNG.
    pub fn to_png(&mut self) -> FimResult<Vec<u8>> {
        self.canvas.convert_to_buffer(Some(&EncodeOptions::png()))
    }

    /// Encode as JPEG. `None` uses the session's default quality.
    pub fn to_jpeg(&mut self, quality: Option<f64>) -> FimResult<Vec<u8>> {
        let opts = EncodeOptions::jpeg(quality.unwrap_or(self.jpeg_quality));
        self.canvas.convert_to_buffer(Some(&opts))
    }

    /// Release native resources. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.canvas.dispose();
    }

    fn ensure_same_size(&self, width: u32, height: u32) -> FimResult<()> {
        if (width, height) != (self.width(), self.height()) {
            return Err(FimError::validation(format!(
                "source is {width}x{height}, canvas is {}x{}; cropping and rescaling are not supported",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fim/image_canvas.rs"]
mod tests;
