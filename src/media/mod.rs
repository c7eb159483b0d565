//! Image payloads
//!
//! An [`ImageBlob`] is the binary image the kiosk submits, whichever way it
//! was acquired. A [`PreviewHandle`] is the display-only summary derived
//! from one specific blob.

pub mod data_url;

pub use data_url::{DecodedDataUrl, decode_data_url, encode_data_url};

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;

/// File name given to decoded camera snapshots
pub const CAMERA_FILE_NAME: &str = "camera-capture.jpg";

/// Owned image bytes plus the metadata needed for a multipart part.
///
/// Cloning is cheap; clones share the same id and bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    id: Uuid,
    file_name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl ImageBlob {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an uploaded image from disk
    pub async fn from_file(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        let mime = guess_mime(&file_name);
        tracing::debug!("Loaded upload {} ({}, {} bytes)", file_name, mime, bytes.len());
        Ok(Self::new(file_name, mime, bytes))
    }

    /// Decode a camera snapshot into the same shape as an upload
    pub fn from_data_url(url: &str) -> Result<Self> {
        let decoded = decode_data_url(url)?;
        Ok(Self::new(CAMERA_FILE_NAME, decoded.mime, decoded.bytes))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn preview(&self) -> PreviewHandle {
        PreviewHandle {
            blob_id: self.id,
            file_name: self.file_name.clone(),
            mime: self.mime.clone(),
            size: self.bytes.len(),
        }
    }
}

/// Display-only reference to one [`ImageBlob`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    blob_id: Uuid,
    pub file_name: String,
    pub mime: String,
    pub size: usize,
}

impl PreviewHandle {
    pub fn blob_id(&self) -> Uuid {
        self.blob_id
    }

    pub fn is_for(&self, blob: &ImageBlob) -> bool {
        self.blob_id == blob.id
    }

    /// e.g. `camera-capture.jpg · image/jpeg · 12.3 KB`
    pub fn summary(&self) -> String {
        format!("{} · {} · {}", self.file_name, self.mime, format_size(self.size))
    }
}

pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Mime type from a file extension
pub fn guess_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    match lower.rsplit('.').next().unwrap_or("") {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
