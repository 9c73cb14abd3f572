use crate::buffer::rgba::RgbaBuffer;
use crate::fim::gl_canvas::GlCanvas;
use crate::fim::image_canvas::ImageCanvas;
use crate::foundation::error::FimResult;
use crate::gl::device::{TextureFilter, TextureId};

bitflags::bitflags! {
    /// Texture creation flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextureFlags: u32 {
        /// Sampled by programs only; never a render target.
        const INPUT_ONLY      = 0b0000_0001;
        /// Bilinear sampling instead of nearest.
        const LINEAR_SAMPLING = 0b0000_0010;
    }
}

impl TextureFlags {
    pub(crate) fn filter(self) -> TextureFilter {
        if self.contains(Self::LINEAR_SAMPLING) {
            TextureFilter::Linear
        } else {
            TextureFilter::Nearest
        }
    }
}

/// Pixel sources a texture can be filled from.
pub enum TextureSource<'a> {
    /// Host pixels.
    Buffer(&'a RgbaBuffer),
    /// Contents of a 2D canvas.
    Canvas(&'a mut ImageCanvas),
    /// Contents of another WebGL canvas.
    Gl(&'a mut GlCanvas),
}

impl TextureSource<'_> {
    /// Read the source through an intermediate host buffer, top row first.
    pub(crate) fn to_rgba_buffer(&mut self) -> FimResult<RgbaBuffer> {
        match self {
            Self::Buffer(buf) => Ok((*buf).clone()),
            Self::Canvas(canvas) => canvas.to_rgba_buffer(),
            Self::Gl(gl) => gl.to_rgba_buffer(),
        }
    }
}

/// Handle to a texture owned by a [`GlCanvas`].
///
/// Textures live as long as their canvas's device; [`GlCanvas::delete_texture`] frees one early.
#[derive(Debug, PartialEq, Eq)]
pub struct GlTexture {
    pub(crate) id: TextureId,
    pub(crate) owner: u64,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) flags: TextureFlags,
}

impl GlTexture {
    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Creation flags.
    pub fn flags(&self) -> TextureFlags {
        self.flags
    }

    /// Device handle.
    pub fn id(&self) -> TextureId {
        self.id
    }
}
