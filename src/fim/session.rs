use std::sync::Arc;

use anyhow::Context;

use crate::buffer::rgba::RgbaBuffer;
use crate::canvas::offscreen::VirtualOffscreenCanvas;
use crate::encode::codec::{decode_image, sniff_mime};
use crate::encode::format::ImageMime;
use crate::fim::capabilities::GlCapabilities;
use crate::fim::gl_canvas::GlCanvas;
use crate::fim::image_canvas::ImageCanvas;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{FimError, FimResult};
use crate::gl::device::GlContextFactory;
use crate::gl::software::{DEFAULT_MAX_TEXTURE_SIZE, SoftwareGlFactory};

/// Environment variable overriding [`FimOpts::jpeg_quality`].
pub const JPEG_QUALITY_ENV: &str = "FIM_JPEG_QUALITY";
/// Environment variable overriding [`FimOpts::max_texture_size`].
pub const MAX_TEXTURE_SIZE_ENV: &str = "FIM_MAX_TEXTURE_SIZE";

/// Options shared by every canvas a [`Fim`] session creates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FimOpts {
    /// Quality used by `to_jpeg(None)`, `0..=1`.
    pub jpeg_quality: f64,
    /// `MAX_TEXTURE_SIZE` of the default software GL factory.
    pub max_texture_size: u32,
}

impl Default for FimOpts {
    fn default() -> Self {
        Self {
            jpeg_quality: 0.95,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
        }
    }
}

impl FimOpts {
    /// Set the default JPEG export quality.
    pub fn with_jpeg_quality(mut self, quality: f64) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Set the software device texture limit.
    pub fn with_max_texture_size(mut self, max: u32) -> Self {
        self.max_texture_size = max;
        self
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `FIM_JPEG_QUALITY` / `FIM_MAX_TEXTURE_SIZE`. Unparsable or out-of-range values are
    /// ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(q) = lookup(JPEG_QUALITY_ENV)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|q| (0.0..=1.0).contains(q))
        {
            self.jpeg_quality = q;
        }
        if let Some(n) = lookup(MAX_TEXTURE_SIZE_ENV)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            self.max_texture_size = n;
        }
        self
    }

    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> FimResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .context("parse fim options JSON")
            .map_err(|e| FimError::validation(format!("{e:#}")))?;
        opts.validate()?;
        Ok(opts)
    }

    fn validate(&self) -> FimResult<()> {
        if !(0.0..=1.0).contains(&self.jpeg_quality) {
            return Err(FimError::validation(format!(
                "jpeg_quality {} outside 0..=1",
                self.jpeg_quality
            )));
        }
        if self.max_texture_size == 0 {
            return Err(FimError::validation("max_texture_size must be > 0"));
        }
        Ok(())
    }
}

/// Entry point of the image library: owns the options and the WebGL context factory used by
/// every canvas it creates.
pub struct Fim {
    opts: FimOpts,
    gl_factory: Arc<dyn GlContextFactory>,
}

impl std::fmt::Debug for Fim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fim").field("opts", &self.opts).finish()
    }
}

impl Default for Fim {
    fn default() -> Self {
        Self::new()
    }
}

impl Fim {
    /// Session with default options and the software GL device.
    pub fn new() -> Self {
        Self::from_parts(FimOpts::default(), None)
    }

    /// Session with `opts` and the software GL device.
    pub fn with_opts(opts: FimOpts) -> FimResult<Self> {
        opts.validate()?;
        Ok(Self::from_parts(opts, None))
    }

    /// Session whose WebGL canvases come from `factory`.
    pub fn with_gl_factory(opts: FimOpts, factory: Arc<dyn GlContextFactory>) -> FimResult<Self> {
        opts.validate()?;
        Ok(Self::from_parts(opts, Some(factory)))
    }

    fn from_parts(opts: FimOpts, factory: Option<Arc<dyn GlContextFactory>>) -> Self {
        let gl_factory = factory.unwrap_or_else(|| {
            Arc::new(SoftwareGlFactory::new().with_max_texture_size(opts.max_texture_size))
        });
        Self { opts, gl_factory }
    }

    /// Session options.
    pub fn opts(&self) -> &FimOpts {
        &self.opts
    }

    /// An unbound offscreen canvas wired to this session's GL factory.
    pub fn create_offscreen(&self, width: u32, height: u32) -> FimResult<VirtualOffscreenCanvas> {
        VirtualOffscreenCanvas::with_gl_factory(width, height, Arc::clone(&self.gl_factory))
    }

    /// Create a 2D canvas, transparent unless `initial_color` is given.
    pub fn create_canvas(
        &self,
        width: u32,
        height: u32,
        initial_color: Option<Rgba8>,
    ) -> FimResult<ImageCanvas> {
        let canvas = self.create_offscreen(width, height)?;
        ImageCanvas::new(canvas, initial_color, self.opts.jpeg_quality)
    }

    /// Decode PNG or JPEG bytes into a new 2D canvas.
    #[tracing::instrument(level = "debug", skip(self, bytes), fields(len = bytes.len()))]
    pub fn create_canvas_from_image_bytes(&self, bytes: &[u8]) -> FimResult<ImageCanvas> {
        let pixels = decode_image(bytes)?;
        let mut canvas = self.create_canvas(pixels.width(), pixels.height(), None)?;
        canvas.copy_from_buffer(&pixels)?;
        Ok(canvas)
    }

    /// Decode JPEG bytes into a new 2D canvas.
    pub fn create_canvas_from_jpeg(&self, bytes: &[u8]) -> FimResult<ImageCanvas> {
        if sniff_mime(bytes) != Some(ImageMime::Jpeg) {
            return Err(FimError::decode("input does not start with a JPEG marker"));
        }
        self.create_canvas_from_image_bytes(bytes)
    }

    /// Create a WebGL canvas, cleared to `initial_color` when given.
    pub fn create_gl_canvas(
        &self,
        width: u32,
        height: u32,
        initial_color: Option<Rgba8>,
    ) -> FimResult<GlCanvas> {
        let canvas = self.create_offscreen(width, height)?;
        GlCanvas::new(canvas, initial_color, self.opts.jpeg_quality)
    }

    /// Allocate a host-side RGBA buffer, transparent unless `initial_color` is given.
    pub fn create_rgba_buffer(
        &self,
        width: u32,
        height: u32,
        initial_color: Option<Rgba8>,
    ) -> FimResult<RgbaBuffer> {
        RgbaBuffer::filled(width, height, initial_color.unwrap_or(Rgba8::TRANSPARENT))
    }

    /// Query the WebGL capabilities of this session's GL factory.
    pub fn capabilities(&self) -> FimResult<GlCapabilities> {
        GlCapabilities::query(self.gl_factory.as_ref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fim/session.rs"]
mod tests;
