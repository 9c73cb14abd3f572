//! CPU reference implementation of [`GlDevice`].
//!
//! Framebuffer and textures are straight-alpha RGBA8 stored bottom row first. Draws shade every
//! target row in parallel on the rayon pool and write without blending.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::buffer::rgba::RgbaBuffer;
use crate::foundation::core::{Rgba8, Size};
use crate::foundation::error::{FimError, FimResult};
use crate::gl::device::{
    DESTROY_CONTEXT_EXTENSION, DestroyContext, DeviceInfo, GlContextFactory, GlDevice, TextureFilter,
    TextureId,
};
use crate::gl::program::{Fragment, FragmentProgram, Sampler};

/// Default `MAX_TEXTURE_SIZE` of the software device.
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 4096;

struct SoftTexture {
    size: Size,
    filter: TextureFilter,
    data: Vec<u8>,
}

/// Software WebGL-style device.
pub struct SoftwareGl {
    size: Size,
    framebuffer: Vec<u8>,
    clear_rgba: [f32; 4],
    textures: HashMap<TextureId, SoftTexture>,
    next_texture: u32,
    max_texture_size: u32,
    destroy_extension: bool,
    destroyed: bool,
}

impl std::fmt::Debug for SoftwareGl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareGl")
            .field("width", &self.size.width)
            .field("height", &self.size.height)
            .field("textures", &self.textures.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl SoftwareGl {
    /// Create a device with a transparent `width × height` default framebuffer.
    pub fn new(width: u32, height: u32) -> FimResult<Self> {
        let size = Size::new(width, height)?;
        Ok(Self {
            size,
            framebuffer: vec![0; size.rgba_len()],
            clear_rgba: [0.0; 4],
            textures: HashMap::new(),
            next_texture: 1,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            destroy_extension: true,
            destroyed: false,
        })
    }

    /// Override `MAX_TEXTURE_SIZE`.
    pub fn with_max_texture_size(mut self, max: u32) -> Self {
        self.max_texture_size = max.max(1);
        self
    }

    /// Hide the destroy extension, as a device without an explicit destroy hook would.
    pub fn without_destroy_extension(mut self) -> Self {
        self.destroy_extension = false;
        self
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn ensure_alive(&self) -> FimResult<()> {
        if self.destroyed {
            return Err(FimError::gl("context has been destroyed"));
        }
        Ok(())
    }

    fn check_texture_size(&self, width: u32, height: u32) -> FimResult<Size> {
        if width > self.max_texture_size || height > self.max_texture_size {
            return Err(FimError::gl(format!(
                "texture {width}x{height} exceeds MAX_TEXTURE_SIZE {}",
                self.max_texture_size
            )));
        }
        Size::new(width, height)
    }

    fn texture_mut(&mut self, id: TextureId) -> FimResult<&mut SoftTexture> {
        self.textures
            .get_mut(&id)
            .ok_or_else(|| FimError::gl(format!("unknown texture {}", id.raw())))
    }
}

impl GlDevice for SoftwareGl {
    fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.size.width, self.size.height)
    }

    fn info(&self) -> DeviceInfo {
        let mut extensions = Vec::new();
        if self.destroy_extension {
            extensions.push(DESTROY_CONTEXT_EXTENSION.to_owned());
        }
        DeviceInfo {
            vendor: "fim-headless".to_owned(),
            renderer: "SoftwareGl".to_owned(),
            version: "WebGL 1.0 (software)".to_owned(),
            shading_language_version: "WebGL GLSL ES 1.0 (software)".to_owned(),
            max_texture_size: self.max_texture_size,
            max_renderbuffer_size: self.max_texture_size,
            extensions,
        }
    }

    fn is_context_lost(&self) -> bool {
        self.destroyed
    }

    fn clear_color(&mut self, rgba: [f32; 4]) -> FimResult<()> {
        self.ensure_alive()?;
        self.clear_rgba = rgba;
        Ok(())
    }

    fn clear(&mut self, target: Option<TextureId>) -> FimResult<()> {
        self.ensure_alive()?;
        let px = Rgba8::from_f32(self.clear_rgba).to_array();
        let data = match target {
            Some(id) => &mut self.texture_mut(id)?.data,
            None => &mut self.framebuffer,
        };
        for chunk in data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        Ok(())
    }

    fn read_pixels(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        out: &mut [u8],
    ) -> FimResult<()> {
        self.ensure_alive()?;
        let fits = x.checked_add(width).is_some_and(|r| r <= self.size.width)
            && y.checked_add(height).is_some_and(|t| t <= self.size.height);
        if !fits {
            return Err(FimError::gl(format!(
                "readPixels {width}x{height}+{x}+{y} outside {}x{} framebuffer",
                self.size.width, self.size.height
            )));
        }
        let row_bytes = width as usize * 4;
        if out.len() != row_bytes * height as usize {
            return Err(FimError::gl(format!(
                "readPixels destination holds {} bytes, expected {}",
                out.len(),
                row_bytes * height as usize
            )));
        }
        let fb_row = self.size.width as usize * 4;
        for (row, dst) in out.chunks_exact_mut(row_bytes).enumerate() {
            let start = (y as usize + row) * fb_row + x as usize * 4;
            dst.copy_from_slice(&self.framebuffer[start..start + row_bytes]);
        }
        Ok(())
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        filter: TextureFilter,
    ) -> FimResult<TextureId> {
        self.ensure_alive()?;
        let size = self.check_texture_size(width, height)?;
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(
            id,
            SoftTexture {
                size,
                filter,
                data: vec![0; size.rgba_len()],
            },
        );
        Ok(id)
    }

    fn tex_image_2d(
        &mut self,
        texture: TextureId,
        pixels: &RgbaBuffer,
        flip_y: bool,
    ) -> FimResult<()> {
        self.ensure_alive()?;
        let size = self.check_texture_size(pixels.width(), pixels.height())?;
        let tex = self.texture_mut(texture)?;
        let src = pixels.as_bytes();
        let row_bytes = pixels.row_bytes();
        let rows = size.height as usize;
        let mut data = Vec::with_capacity(src.len());
        for row in 0..rows {
            // GL row 0 is the first uploaded row unless flipped.
            let src_row = if flip_y { rows - 1 - row } else { row };
            data.extend_from_slice(&src[src_row * row_bytes..(src_row + 1) * row_bytes]);
        }
        tex.size = size;
        tex.data = data;
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureId) -> FimResult<()> {
        self.ensure_alive()?;
        self.textures
            .remove(&texture)
            .map(|_| ())
            .ok_or_else(|| FimError::gl(format!("unknown texture {}", texture.raw())))
    }

    fn draw(
        &mut self,
        program: &dyn FragmentProgram,
        inputs: &[TextureId],
        target: Option<TextureId>,
    ) -> FimResult<()> {
        self.ensure_alive()?;
        if let Some(t) = target
            && inputs.contains(&t)
        {
            return Err(FimError::gl(format!(
                "texture {} is bound as both input and target",
                t.raw()
            )));
        }

        let mut target_tex = match target {
            Some(id) => Some(
                self.textures
                    .remove(&id)
                    .ok_or_else(|| FimError::gl(format!("unknown texture {}", id.raw())))?,
            ),
            None => None,
        };

        let samplers: FimResult<Vec<Sampler<'_>>> = inputs
            .iter()
            .map(|id| {
                self.textures
                    .get(id)
                    .map(|t| Sampler::new(t.size.width, t.size.height, t.filter, &t.data))
                    .ok_or_else(|| FimError::gl(format!("unknown texture {}", id.raw())))
            })
            .collect();

        let result = samplers.map(|samplers| {
            let (size, dst) = match target_tex.as_mut() {
                Some(t) => (t.size, &mut t.data),
                None => (self.size, &mut self.framebuffer),
            };
            shade(program, &samplers, size, dst);
        });

        if let (Some(id), Some(tex)) = (target, target_tex) {
            self.textures.insert(id, tex);
        }
        tracing::trace!(program = program.name(), inputs = inputs.len(), "draw");
        result
    }

    fn destroy_context_extension(&mut self) -> Option<&mut dyn DestroyContext> {
        if self.destroy_extension {
            Some(self)
        } else {
            None
        }
    }
}

impl DestroyContext for SoftwareGl {
    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.framebuffer = Vec::new();
        self.textures.clear();
        tracing::debug!(
            width = self.size.width,
            height = self.size.height,
            "software gl context destroyed"
        );
    }
}

fn shade(program: &dyn FragmentProgram, inputs: &[Sampler<'_>], size: Size, dst: &mut [u8]) {
    let (w, h) = (size.width, size.height);
    let row_bytes = w as usize * 4;
    dst.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let x = x as u32;
                let frag = Fragment {
                    coord: [
                        (x as f32 + 0.5) / w as f32,
                        (y as f32 + 0.5) / h as f32,
                    ],
                    pixel: [x, y],
                    resolution: [w, h],
                };
                px.copy_from_slice(&Rgba8::from_f32(program.shade(&frag, inputs)).to_array());
            }
        });
}

/// [`GlContextFactory`] producing [`SoftwareGl`] devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoftwareGlFactory {
    max_texture_size: u32,
    destroy_extension: bool,
}

impl Default for SoftwareGlFactory {
    fn default() -> Self {
        Self {
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            destroy_extension: true,
        }
    }
}

impl SoftwareGlFactory {
    /// Factory with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `MAX_TEXTURE_SIZE` of created devices.
    pub fn with_max_texture_size(mut self, max: u32) -> Self {
        self.max_texture_size = max.max(1);
        self
    }

    /// Create devices without the destroy extension.
    pub fn without_destroy_extension(mut self) -> Self {
        self.destroy_extension = false;
        self
    }
}

impl GlContextFactory for SoftwareGlFactory {
    fn create_context(&self, width: u32, height: u32) -> FimResult<Box<dyn GlDevice>> {
        if width > self.max_texture_size || height > self.max_texture_size {
            return Err(FimError::gl(format!(
                "drawing buffer {width}x{height} exceeds MAX_TEXTURE_SIZE {}",
                self.max_texture_size
            )));
        }
        let mut device = SoftwareGl::new(width, height)?.with_max_texture_size(self.max_texture_size);
        if !self.destroy_extension {
            device = device.without_destroy_extension();
        }
        Ok(Box::new(device))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gl/software.rs"]
mod tests;
