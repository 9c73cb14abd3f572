pub(crate) mod capabilities;
pub(crate) mod gl_canvas;
pub(crate) mod image_canvas;
pub(crate) mod session;
pub(crate) mod texture;
