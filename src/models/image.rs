use std::io::Cursor;

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Standard alphabet, padding optional on decode.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Body returned by the image proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyImagePayload {
    pub mime_type: String,
    pub base64: String,
}

/// Decoded image content ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContent {
    mime_type: String,
    encoded: String,
    bytes: Bytes,
}

impl ImageContent {
    /// Build content from a proxy payload.
    ///
    /// The payload may be line-wrapped and may omit its `=` padding. ASCII
    /// whitespace is stripped before decoding and from the data URI.
    pub fn from_payload(payload: ProxyImagePayload) -> Result<Self, base64::DecodeError> {
        let encoded: String = payload
            .base64
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = PAYLOAD_ENGINE.decode(encoded.as_bytes())?;
        Ok(Self {
            mime_type: payload.mime_type,
            encoded,
            bytes: Bytes::from(bytes),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// `data:<mimeType>;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.encoded)
    }

    /// Pixel dimensions if the bytes decode as a supported image format.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        image::ImageReader::new(Cursor::new(self.bytes.as_ref()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

/// Per-slot resolution state.
///
/// `Pending` until the fetch settles. `Ready` and `Failed` are terminal;
/// there is no transition back out of either.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolvedImage {
    #[default]
    Pending,
    Ready(ImageContent),
    Failed(String),
}

impl ResolvedImage {
    pub fn is_pending(&self) -> bool {
        matches!(self, ResolvedImage::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ResolvedImage::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ResolvedImage::Failed(_))
    }

    pub fn content(&self) -> Option<&ImageContent> {
        match self {
            ResolvedImage::Ready(content) => Some(content),
            _ => None,
        }
    }

    pub fn status_str(&self) -> &'static str {
        match self {
            ResolvedImage::Pending => "pending",
            ResolvedImage::Ready(_) => "ready",
            ResolvedImage::Failed(_) => "failed",
        }
    }
}
