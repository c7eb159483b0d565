//! `data:` URL codec
//!
//! Camera snapshots cross the capture boundary as
//! `data:image/jpeg;base64,...`. Only base64 payloads are supported.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{MoodRxError, Result};

/// Decoded payload of a `data:` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn decode_data_url(url: &str) -> Result<DecodedDataUrl> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| MoodRxError::InvalidDataUrl("missing data: scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| MoodRxError::InvalidDataUrl("missing ',' separator".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| MoodRxError::InvalidDataUrl("only base64 payloads are supported".to_string()))?;

    // Parameters like `;charset=` may sit between the mime and `;base64`
    let mime = mime.split(';').next().unwrap_or_default().trim();
    if mime.is_empty() {
        return Err(MoodRxError::InvalidDataUrl("missing mime type".to_string()));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| MoodRxError::InvalidDataUrl(format!("bad base64 payload: {}", e)))?;

    Ok(DecodedDataUrl {
        mime: mime.to_string(),
        bytes,
    })
}
