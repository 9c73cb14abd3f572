use crate::foundation::error::FimResult;
use crate::gl::backing::GlBacking;
use crate::gl::device::GlContextFactory;

/// WebGL capabilities of a device factory.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GlCapabilities {
    /// `VENDOR` string.
    pub gl_vendor: String,
    /// `RENDERER` string.
    pub gl_renderer: String,
    /// `VERSION` string.
    pub gl_version: String,
    /// `SHADING_LANGUAGE_VERSION` string.
    pub gl_shading_language_version: String,
    /// `MAX_TEXTURE_SIZE`.
    pub gl_max_texture_size: u32,
    /// `MAX_RENDERBUFFER_SIZE`.
    pub gl_max_renderbuffer_size: u32,
    /// Supported extension names, sorted.
    pub gl_extensions: Vec<String>,
}

impl GlCapabilities {
    /// Probe `factory` with a throwaway 1×1 context, released before returning.
    pub fn query(factory: &dyn GlContextFactory) -> FimResult<Self> {
        let mut backing = GlBacking::new(factory.create_context(1, 1)?);
        let info = backing.device().info();
        backing.release();

        let mut gl_extensions = info.extensions;
        gl_extensions.sort();
        Ok(Self {
            gl_vendor: info.vendor,
            gl_renderer: info.renderer,
            gl_version: info.version,
            gl_shading_language_version: info.shading_language_version,
            gl_max_texture_size: info.max_texture_size,
            gl_max_renderbuffer_size: info.max_renderbuffer_size,
            gl_extensions,
        })
    }

    /// Pretty-printed JSON report.
    pub fn to_json(&self) -> FimResult<String> {
        Ok(serde_json::to_string_pretty(self).map_err(anyhow::Error::from)?)
    }
}
