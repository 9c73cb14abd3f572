use std::fmt;
use std::str::FromStr;

use crate::foundation::error::FimError;

/// Default JPEG quality used when [`EncodeOptions::quality`] is absent.
pub const DEFAULT_JPEG_QUALITY: f64 = 0.75;

/// Encoded image MIME types the canvas can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageMime {
    /// `image/png` (lossless).
    #[default]
    Png,
    /// `image/jpeg` (lossy, alpha flattened onto black).
    Jpeg,
}

impl ImageMime {
    /// MIME string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageMime {
    type Err = FimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image/png" => Ok(Self::Png),
            "image/jpeg" => Ok(Self::Jpeg),
            other => Err(FimError::unsupported_format(format!(
                "mime type \"{other}\" (expected image/png or image/jpeg)"
            ))),
        }
    }
}

impl serde::Serialize for ImageMime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for ImageMime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Options accepted by `convert_to_buffer` / `convert_to_blob`.
///
/// Deserializes from `{ "type": "image/jpeg", "quality": 0.9 }`; `format` is accepted as an alias
/// of `type`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EncodeOptions {
    /// Output format.
    #[serde(rename = "type", alias = "format", default)]
    pub format: ImageMime,
    /// JPEG quality in `0..=1`. Ignored for PNG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

impl EncodeOptions {
    /// PNG output.
    pub fn png() -> Self {
        Self {
            format: ImageMime::Png,
            quality: None,
        }
    }

    /// JPEG output with the given `0..=1` quality.
    pub fn jpeg(quality: f64) -> Self {
        Self {
            format: ImageMime::Jpeg,
            quality: Some(quality),
        }
    }

    /// Parse options from a MIME string and optional quality.
    pub fn from_mime(mime: &str, quality: Option<f64>) -> Result<Self, FimError> {
        Ok(Self {
            format: mime.parse()?,
            quality,
        })
    }
}

/// Encoded bytes tagged with their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob {
    mime: ImageMime,
    bytes: Vec<u8>,
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Blob {
    pub(crate) fn new(mime: ImageMime, bytes: Vec<u8>) -> Self {
        Self { mime, bytes }
    }

    /// MIME type string, e.g. `image/png`.
    pub fn mime_type(&self) -> &'static str {
        self.mime.as_str()
    }

    /// MIME type.
    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Return `true` when no bytes were produced.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume into the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;
