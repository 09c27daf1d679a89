//! Validation and decoding for user-supplied X-ray images.
//!
//! A file is accepted only when its media type starts with `image/`. Accepted
//! files keep their raw bytes for upload; previews and service-returned PNGs
//! are decoded into `egui::ColorImage`s off the UI thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use egui::ColorImage;
use image::imageops::FilterType;
use thiserror::Error;

/// Largest file accepted for upload.
pub const MAX_IMAGE_BYTES: u64 = 32 * 1024 * 1024;
/// Shown to the user when a non-image file is picked or dropped.
pub const INVALID_FILE_TYPE_MESSAGE: &str = "Please upload a valid image file (JPG or PNG)";
/// Decoded images are downscaled so neither side exceeds this many pixels.
pub const MAX_TEXTURE_SIDE: u32 = 2048;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum ImageFileError {
    #[error("{}", INVALID_FILE_TYPE_MESSAGE)]
    InvalidFileType { name: String, media_type: String },
    #[error("{name} is too large ({size} bytes; limit is {} bytes)", MAX_IMAGE_BYTES)]
    TooLarge { name: String, size: u64 },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// An accepted image file, ready to be previewed and uploaded.
#[derive(Clone, Debug)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    /// Validate a file on disk and read it.
    ///
    /// The media type is checked before any bytes are read, so rejected files
    /// cost nothing.
    pub fn from_path(path: &Path) -> Result<Self, ImageFileError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let media_type = media_type_for(&name);
        ensure_image_media_type(&name, media_type)?;
        let size = std::fs::metadata(path)
            .map_err(|source| ImageFileError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        ensure_size(&name, size)?;
        let bytes = std::fs::read(path).map_err(|source| ImageFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            name,
            media_type: media_type.to_string(),
            bytes: bytes.into(),
        })
    }

    /// Validate an in-memory file, e.g. one dropped without a filesystem path.
    ///
    /// A non-empty `reported_type` (as supplied by the platform) takes
    /// precedence over the extension.
    pub fn from_bytes(
        name: impl Into<String>,
        reported_type: Option<&str>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, ImageFileError> {
        let name = name.into();
        let media_type = reported_type
            .map(str::trim)
            .filter(|media_type| !media_type.is_empty())
            .unwrap_or_else(|| media_type_for(&name))
            .to_string();
        ensure_image_media_type(&name, &media_type)?;
        let bytes = bytes.into();
        ensure_size(&name, bytes.len() as u64)?;
        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }
}

/// Media type implied by a filename's extension.
pub fn media_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("tif" | "tiff") => "image/tiff",
        _ => FALLBACK_MEDIA_TYPE,
    }
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.to_ascii_lowercase().starts_with("image/")
}

fn ensure_image_media_type(name: &str, media_type: &str) -> Result<(), ImageFileError> {
    if is_image_media_type(media_type) {
        Ok(())
    } else {
        Err(ImageFileError::InvalidFileType {
            name: name.to_string(),
            media_type: media_type.to_string(),
        })
    }
}

fn ensure_size(name: &str, size: u64) -> Result<(), ImageFileError> {
    if size > MAX_IMAGE_BYTES {
        return Err(ImageFileError::TooLarge {
            name: name.to_string(),
            size,
        });
    }
    Ok(())
}

/// Decode raw image bytes into a texture-ready image.
pub fn decode_preview(bytes: &[u8]) -> Result<ColorImage, ImageDecodeError> {
    let mut decoded = image::load_from_memory(bytes)?;
    if decoded.width() > MAX_TEXTURE_SIDE || decoded.height() > MAX_TEXTURE_SIDE {
        decoded = decoded.resize(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE, FilterType::Triangle);
    }
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Decode a base64 PNG as returned by the prediction service.
pub fn decode_base64_image(encoded: &str) -> Result<ColorImage, ImageDecodeError> {
    let payload = strip_data_url_prefix(encoded.trim());
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    decode_preview(&bytes)
}

fn strip_data_url_prefix(encoded: &str) -> &str {
    if encoded.starts_with("data:")
        && let Some((_, payload)) = encoded.split_once(',')
    {
        return payload;
    }
    encoded
}
