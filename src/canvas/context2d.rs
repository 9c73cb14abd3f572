//! 2D raster backing context.
//!
//! Vector draws are recorded into a `vello_cpu::RenderContext`. `vello_cpu` renders into a fresh
//! buffer, so pending draws are rendered into a scratch layer and then composited (premultiplied
//! source-over) onto the committed surface before any pixel read or direct pixel write.

use crate::buffer::rgba::RgbaBuffer;
use crate::foundation::core::{Affine, BezPath, Rect, Rgba8, Size};
use crate::foundation::error::{FimError, FimResult};
use crate::foundation::math::{
    premul_over_in_place, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};

/// A 2D drawing context backed by a premultiplied RGBA8 raster surface.
pub struct Context2d {
    size: Size,
    surface: vello_cpu::Pixmap,
    layer: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    pending: bool,
    fill_style: Rgba8,
    transform: Affine,
}

impl std::fmt::Debug for Context2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context2d")
            .field("width", &self.size.width)
            .field("height", &self.size.height)
            .field("pending", &self.pending)
            .field("fill_style", &self.fill_style)
            .finish()
    }
}

impl Context2d {
    /// Create a transparent surface of exactly `width × height` pixels.
    pub fn new(width: u32, height: u32) -> FimResult<Self> {
        let size = Size::new(width, height)?;
        let w: u16 = width
            .try_into()
            .map_err(|_| FimError::validation("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| FimError::validation("surface height exceeds u16"))?;
        Ok(Self {
            size,
            surface: vello_cpu::Pixmap::new(w, h),
            layer: vello_cpu::Pixmap::new(w, h),
            ctx: vello_cpu::RenderContext::new(w, h),
            pending: false,
            fill_style: Rgba8::BLACK,
            transform: Affine::IDENTITY,
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

    /// Current fill color.
    pub fn fill_style(&self) -> Rgba8 {
        self.fill_style
    }

    /// Set the color used by subsequent fills.
    pub fn set_fill_style(&mut self, color: Rgba8) {
        self.fill_style = color;
    }

    /// Current user-to-device transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Replace the user-to-device transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    /// Reset the transform to identity.
    pub fn reset_transform(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    /// Fill `rect` (user space) with the current fill style, source-over.
    pub fn fill_rect(&mut self, rect: Rect) {
        self.prepare_paint();
        self.ctx.fill_rect(&rect_to_cpu(rect));
        self.pending = true;
    }

    /// Fill `path` (user space, non-zero winding) with the current fill style, source-over.
    pub fn fill_path(&mut self, path: &BezPath) {
        self.prepare_paint();
        self.ctx.fill_path(&bezpath_to_cpu(path));
        self.pending = true;
    }

    /// Set every pixel inside `rect` (device space, snapped outward to whole pixels) to
    /// transparent black.
    pub fn clear_rect(&mut self, rect: Rect) -> FimResult<()> {
        self.flush()?;
        let Some((x0, y0, x1, y1)) = self.device_bounds(rect) else {
            return Ok(());
        };
        let row_bytes = self.size.width as usize * 4;
        let data = self.surface.data_as_u8_slice_mut();
        for y in y0..y1 {
            let start = y * row_bytes + x0 * 4;
            let end = y * row_bytes + x1 * 4;
            data[start..end].fill(0);
        }
        Ok(())
    }

    /// Overwrite every pixel with `color`, discarding pending draws.
    pub fn clear_to(&mut self, color: Rgba8) {
        self.ctx.reset();
        self.pending = false;
        let mut px = color.to_array();
        premultiply_rgba8_in_place(&mut px);
        for chunk in self.surface.data_as_u8_slice_mut().chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Commit pending vector draws onto the surface.
    pub fn flush(&mut self) -> FimResult<()> {
        if !self.pending {
            return Ok(());
        }
        self.ctx.flush();
        self.layer.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.layer);
        premul_over_in_place(
            self.surface.data_as_u8_slice_mut(),
            self.layer.data_as_u8_slice(),
        )?;
        self.ctx.reset();
        self.pending = false;
        Ok(())
    }

    /// Read the pixel at `(x, y)` as straight alpha.
    pub fn get_pixel(&mut self, x: u32, y: u32) -> FimResult<Rgba8> {
        if !self.size.contains(x, y) {
            return Err(FimError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} canvas",
                self.size.width, self.size.height
            )));
        }
        self.flush()?;
        let i = (y as usize * self.size.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.surface.data_as_u8_slice()[i..i + 4]);
        unpremultiply_rgba8_in_place(&mut px);
        Ok(Rgba8::from_array(px))
    }

    /// Copy a region of the surface out as straight-alpha RGBA.
    pub fn get_image_data(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> FimResult<RgbaBuffer> {
        let fits = x.checked_add(width).is_some_and(|r| r <= self.size.width)
            && y.checked_add(height).is_some_and(|b| b <= self.size.height);
        if !fits {
            return Err(FimError::validation(format!(
                "region {width}x{height}+{x}+{y} outside {}x{} canvas",
                self.size.width, self.size.height
            )));
        }
        self.flush()?;
        let mut out = RgbaBuffer::new(width, height)?;
        let src_row = self.size.width as usize * 4;
        let dst_row = out.row_bytes();
        let src = self.surface.data_as_u8_slice();
        for (row, dst) in out.as_bytes_mut().chunks_exact_mut(dst_row).enumerate() {
            let start = (y as usize + row) * src_row + x as usize * 4;
            dst.copy_from_slice(&src[start..start + dst_row]);
        }
        unpremultiply_rgba8_in_place(out.as_bytes_mut());
        Ok(out)
    }

    /// Copy the whole surface out as straight-alpha RGBA.
    pub fn image_data(&mut self) -> FimResult<RgbaBuffer> {
        self.get_image_data(0, 0, self.size.width, self.size.height)
    }

    /// Write straight-alpha pixels at `(dx, dy)`, replacing existing pixels. The part of the
    /// source that falls outside the surface is clipped.
    pub fn put_image_data(&mut self, pixels: &RgbaBuffer, dx: u32, dy: u32) -> FimResult<()> {
        self.flush()?;
        if dx >= self.size.width || dy >= self.size.height {
            return Ok(());
        }
        let copy_w = pixels.width().min(self.size.width - dx) as usize;
        let copy_h = pixels.height().min(self.size.height - dy) as usize;
        let src_row = pixels.row_bytes();
        let dst_row = self.size.width as usize * 4;
        let src = pixels.as_bytes();
        let dst = self.surface.data_as_u8_slice_mut();
        for row in 0..copy_h {
            let s = row * src_row;
            let d = (dy as usize + row) * dst_row + dx as usize * 4;
            let out = &mut dst[d..d + copy_w * 4];
            out.copy_from_slice(&src[s..s + copy_w * 4]);
            premultiply_rgba8_in_place(out);
        }
        Ok(())
    }

    fn prepare_paint(&mut self) {
        let c = self.fill_style;
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }

    fn device_bounds(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let w = f64::from(self.size.width);
        let h = f64::from(self.size.height);
        let r = rect.abs();
        let x0 = r.x0.floor().clamp(0.0, w) as usize;
        let y0 = r.y0.floor().clamp(0.0, h) as usize;
        let x1 = r.x1.ceil().clamp(0.0, w) as usize;
        let y1 = r.y1.ceil().clamp(0.0, h) as usize;
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/context2d.rs"]
mod tests;
