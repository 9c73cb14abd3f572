use crate::foundation::error::{FimError, FimResult};
use crate::gl::device::{DESTROY_CONTEXT_EXTENSION, GlDevice};

/// Owning guard around a canvas's WebGL device.
///
/// The device's destroy hook runs exactly once: on the first [`GlBacking::release`] or, failing
/// that, when the guard is dropped. A device without the hook is treated as released.
pub struct GlBacking {
    device: Box<dyn GlDevice>,
    released: bool,
}

impl std::fmt::Debug for GlBacking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = self.device.drawing_buffer_size();
        f.debug_struct("GlBacking")
            .field("width", &width)
            .field("height", &height)
            .field("released", &self.released)
            .finish()
    }
}

impl GlBacking {
    /// Take ownership of `device`.
    pub fn new(device: Box<dyn GlDevice>) -> Self {
        Self {
            device,
            released: false,
        }
    }

    /// The wrapped device. After release it still answers, but rejects work.
    pub fn device(&mut self) -> &mut dyn GlDevice {
        self.device.as_mut()
    }

    /// Like [`GlBacking::device`], but fails once the backing has been released.
    pub fn live_device(&mut self) -> FimResult<&mut dyn GlDevice> {
        if self.released {
            return Err(FimError::gl("webgl context has been disposed"));
        }
        Ok(self.device.as_mut())
    }

    /// Whether [`GlBacking::release`] has run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Destroy the device through its destroy hook. Later calls do nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let (width, height) = self.device.drawing_buffer_size();
        match self.device.destroy_context_extension() {
            Some(hook) => {
                hook.destroy();
                tracing::debug!(width, height, "released webgl backing");
            }
            None => {
                tracing::warn!(
                    width,
                    height,
                    extension = DESTROY_CONTEXT_EXTENSION,
                    "webgl device has no destroy hook; leaving it to drop"
                );
            }
        }
    }
}

impl Drop for GlBacking {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gl/backing.rs"]
mod tests;
