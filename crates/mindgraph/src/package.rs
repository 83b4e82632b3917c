//! Final payload assembly.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mindgraph_core::MindMapMetadata;
use mindgraph_render::ImageFormat;
use serde::{Deserialize, Serialize};

/// What a caller gets back: the encoded image, the structural metadata, and the theme/layout
/// that were actually used (after fallback).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapResult {
    /// Base64 (standard alphabet, padded) image bytes. `None` for metadata-only results.
    pub image: Option<String>,
    pub format: ImageFormat,
    pub metadata: MindMapMetadata,
    pub theme: String,
    pub layout: String,
}

impl MindMapResult {
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn decode_image(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        self.image.as_deref().map(|s| STANDARD.decode(s)).transpose()
    }
}

/// Bundles rendered bytes with metadata. Pure assembly; nothing is transformed.
pub fn package(
    image: &[u8],
    format: ImageFormat,
    metadata: MindMapMetadata,
    theme: &str,
    layout: &str,
) -> MindMapResult {
    MindMapResult {
        image: Some(STANDARD.encode(image)),
        format,
        metadata,
        theme: theme.to_string(),
        layout: layout.to_string(),
    }
}

/// Same payload without an image, for callers that degrade when rendering is unavailable.
pub fn package_metadata_only(
    format: ImageFormat,
    metadata: MindMapMetadata,
    theme: &str,
    layout: &str,
) -> MindMapResult {
    MindMapResult {
        image: None,
        format,
        metadata,
        theme: theme.to_string(),
        layout: layout.to_string(),
    }
}
