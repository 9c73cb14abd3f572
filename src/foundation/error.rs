/// Convenience result type used across the crate.
pub type FimResult<T> = Result<T, FimError>;

/// Error taxonomy for canvas, device and codec operations.
#[derive(thiserror::Error, Debug)]
pub enum FimError {
    /// Requested context kind is unsupported, or conflicts with the kind already bound.
    #[error("invalid context kind: {0}")]
    InvalidContextKind(String),

    /// Conversion was requested before any drawing context was acquired.
    #[error("no active context: nothing has been drawn on this canvas")]
    NoActiveContext,

    /// The encoder cannot satisfy the requested format or options.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Capability intentionally left out of the emulation.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Caller contract violation (dimensions, coordinates, buffer sizes, colors).
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reported by a GL device (lost context, unknown texture, bad readback).
    #[error("gl error: {0}")]
    Gl(String),

    /// Encoded image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FimError {
    /// Build a [`FimError::InvalidContextKind`] value.
    pub fn invalid_context_kind(msg: impl Into<String>) -> Self {
        Self::InvalidContextKind(msg.into())
    }

    /// Build a [`FimError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`FimError::NotImplemented`] value.
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }

    /// Build a [`FimError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FimError::Gl`] value.
    pub fn gl(msg: impl Into<String>) -> Self {
        Self::Gl(msg.into())
    }

    /// Build a [`FimError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
