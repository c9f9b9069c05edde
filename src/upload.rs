//! Upload validation and image loading
//!
//! An upload goes through three stages, each with its own error class:
//!
//! 1. validation: MIME type against the allow-list, size against the ceiling
//!    (`UnsupportedFileType`, `FileTooLarge`)
//! 2. reading the bytes into memory (`ReadError`)
//! 3. decoding into pixels, deferred until analysis (`DecodeError`)
//!
//! The MIME type is taken from the file extension, the way a file picker
//! labels a file before any byte is read. Decoding goes by the file's
//! contents, so a mislabelled image still decodes.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::config::UploadConfig;
use crate::error::{AnalysisError, Result};

/// MIME type reported for files with no recognized extension
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Image formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from a MIME type
    pub fn from_mime(mime: &str) -> Option<ImageFormat> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/gif" => Some(ImageFormat::Gif),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// MIME type a file would be labelled with, based on its extension
pub fn mime_type_for(path: &Path) -> &'static str {
    ImageFormat::from_extension(path)
        .map(|f| f.mime_type())
        .unwrap_or(UNKNOWN_MIME)
}

/// Check a file's MIME type and size against the upload limits
///
/// The type is checked before the size.
pub fn validate_upload(mime: &str, size: u64, config: &UploadConfig) -> Result<ImageFormat> {
    let format = ImageFormat::from_mime(mime)
        .filter(|_| config.allows(mime))
        .ok_or_else(|| AnalysisError::UnsupportedFileType {
            mime: mime.to_string(),
        })?;

    if size > config.max_file_size {
        return Err(AnalysisError::FileTooLarge {
            size,
            limit: config.max_file_size,
        });
    }

    debug!(mime, size, "upload accepted");
    Ok(format)
}

/// A validated upload held in memory, not yet decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    path: PathBuf,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl SelectedImage {
    /// Validate an in-memory upload
    pub fn from_bytes(
        path: impl Into<PathBuf>,
        mime: &str,
        bytes: Vec<u8>,
        config: &UploadConfig,
    ) -> Result<Self> {
        let format = validate_upload(mime, bytes.len() as u64, config)?;
        Ok(Self {
            path: path.into(),
            format,
            bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Decode the bytes, detecting the format from their signature
    ///
    /// Falls back to the format implied by the MIME type when the signature
    /// is not recognized.
    pub fn decode(&self) -> Result<DynamicImage> {
        let mut reader = ImageReader::new(Cursor::new(self.bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| AnalysisError::read(format!("{}", self.path.display()), e))?;

        match reader.format() {
            Some(detected) if detected != image::ImageFormat::from(self.format) => {
                debug!(
                    path = %self.path.display(),
                    labelled = self.format.mime_type(),
                    detected = ?detected,
                    "content does not match upload type"
                );
            }
            Some(_) => {}
            None => reader.set_format(self.format.into()),
        }

        reader.decode().map_err(|e| {
            AnalysisError::decode(format!("{} is not a decodable image", self.path.display()), e)
        })
    }
}

/// Validate a file on disk and read it into memory
///
/// # Errors
///
/// - `UnsupportedFileType` / `FileTooLarge` when validation fails; nothing is read
/// - `ReadError` when the file metadata or contents cannot be read
///
/// The bytes actually read are checked against the ceiling again, and at
/// most one byte past it is read, so a file that grows in between is still
/// rejected.
pub fn read_upload(path: &Path, config: &UploadConfig) -> Result<SelectedImage> {
    let read_error = |e: std::io::Error| AnalysisError::read(format!("{}", path.display()), e);

    let metadata = std::fs::metadata(path).map_err(read_error)?;
    let mime = mime_type_for(path);
    validate_upload(mime, metadata.len(), config)?;

    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|file| {
            file.take(config.max_file_size.saturating_add(1))
                .read_to_end(&mut bytes)
        })
        .map_err(read_error)?;

    SelectedImage::from_bytes(path, mime, bytes, config)
}
