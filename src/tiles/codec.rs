//! Tile Codec Adapter
//!
//! Decodes an upstream tile to RGBA8, runs the pixel transformer for its
//! family and re-encodes the result as PNG.

use std::io::Cursor;

use bytes::Bytes;
use image::{ImageFormat, RgbaImage};

use super::hide::HideSet;
use super::palette::{DESIGNATION_COLORS, PLOW_RECENCY_MAPPINGS};
use super::pixel::{filter_pixels, recolor_pixels};
use super::TileKind;
use crate::error::TransformError;

/// Content type of every re-encoded tile.
pub const TRANSFORMED_CONTENT_TYPE: &str = "image/png";

// == Transform Outcome ==
/// Result of rendering a raw tile for one request.
#[derive(Debug)]
pub enum TransformOutcome {
    /// Pixels were rewritten and re-encoded as PNG
    Transformed(Bytes),
    /// Nothing to do for this request; raw bytes are served as-is
    Unchanged(Bytes),
    /// Decode or encode failed; raw bytes are served instead
    Fallback { raw: Bytes, error: TransformError },
}

impl TransformOutcome {
    /// Body and content type to send to the client.
    ///
    /// Raw bodies are labelled by their magic number, then by `declared`
    /// (the upstream `Content-Type`, when this request fetched it), then PNG.
    pub fn into_body(self, declared: Option<&str>) -> (Bytes, String) {
        match self {
            TransformOutcome::Transformed(png) => (png, TRANSFORMED_CONTENT_TYPE.to_string()),
            TransformOutcome::Unchanged(raw) | TransformOutcome::Fallback { raw, .. } => {
                let content_type = sniff_content_type(&raw)
                    .or(declared)
                    .unwrap_or(TRANSFORMED_CONTENT_TYPE)
                    .to_string();
                (raw, content_type)
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TransformOutcome::Fallback { .. })
    }
}

// == Transform Tile ==
/// Applies the family-specific pixel transform to raw upstream bytes.
///
/// Plow tiles are always recolored. Designation tiles are only decoded when
/// the hide set is non-empty.
pub fn transform_tile(raw: Bytes, kind: TileKind, hide: &HideSet) -> TransformOutcome {
    if kind == TileKind::Designation && hide.is_empty() {
        return TransformOutcome::Unchanged(raw);
    }

    match rewrite(&raw, kind, hide) {
        Ok(png) => TransformOutcome::Transformed(Bytes::from(png)),
        Err(error) => TransformOutcome::Fallback { raw, error },
    }
}

fn rewrite(raw: &[u8], kind: TileKind, hide: &HideSet) -> Result<Vec<u8>, TransformError> {
    let mut tile = decode_rgba(raw)?;
    match kind {
        TileKind::PlowRecency => recolor_pixels(&mut tile, &PLOW_RECENCY_MAPPINGS, hide),
        TileKind::Designation => filter_pixels(&mut tile, &DESIGNATION_COLORS, hide),
    }
    encode_png(&tile)
}

// == Decode / Encode ==
/// Decodes any supported raster format into an RGBA8 buffer.
pub fn decode_rgba(raw: &[u8]) -> Result<RgbaImage, TransformError> {
    image::load_from_memory(raw)
        .map(|img| img.to_rgba8())
        .map_err(TransformError::Decode)
}

pub fn encode_png(tile: &RgbaImage) -> Result<Vec<u8>, TransformError> {
    let mut out = Cursor::new(Vec::new());
    tile.write_to(&mut out, ImageFormat::Png)
        .map_err(TransformError::Encode)?;
    Ok(out.into_inner())
}

/// Content type from the magic number, if it is a known raster format.
pub fn sniff_content_type(raw: &[u8]) -> Option<&'static str> {
    image::guess_format(raw)
        .ok()
        .map(|format| format.to_mime_type())
}
