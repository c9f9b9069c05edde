//! Error types for the tone_palette library

use thiserror::Error;

/// Result type alias for tone_palette operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for upload, extraction and palette operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// File type is not in the upload allow-list
    #[error("Unsupported file type: {mime}")]
    UnsupportedFileType { mime: String },

    /// File exceeds the upload size ceiling
    #[error("File too large: {size} bytes (limit: {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    /// File could not be read into memory
    #[error("Failed to read file: {message}")]
    ReadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image bytes could not be decoded into pixels
    #[error("Failed to decode image: {message}")]
    DecodeError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Dominant color extraction failed on a decoded image
    #[error("Dominant color extraction failed: {reason}")]
    ExtractionError { reason: String },

    /// Color literal could not be parsed
    #[error("Invalid color '{input}': {reason}")]
    InvalidColor { input: String, reason: String },

    /// Configuration file could not be loaded or saved
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic processing error
    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

impl AnalysisError {
    /// Create a read error with context
    pub fn read<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ReadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a decode error with context
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DecodeError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_color(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error was raised while validating an upload
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AnalysisError::UnsupportedFileType { .. } | AnalysisError::FileTooLarge { .. }
        )
    }

    /// Check if retrying with another file (or the same one) can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::UnsupportedFileType { .. }
                | AnalysisError::FileTooLarge { .. }
                | AnalysisError::DecodeError { .. }
                | AnalysisError::ExtractionError { .. }
        )
    }

    /// Get user-friendly error description for display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::UnsupportedFileType { .. } => {
                "Unsupported file type. Only JPEG, PNG, GIF and WEBP files can be uploaded."
                    .to_string()
            }
            AnalysisError::FileTooLarge { limit, .. } => {
                format!(
                    "The file is too large. Files up to {} can be uploaded.",
                    format_size(*limit)
                )
            }
            AnalysisError::ReadError { .. } => {
                "An error occurred while reading the file.".to_string()
            }
            AnalysisError::DecodeError { .. } | AnalysisError::ExtractionError { .. } => {
                "An error occurred while analyzing the image. Please try another image."
                    .to_string()
            }
            AnalysisError::InvalidColor { input, .. } => {
                format!("'{}' is not a valid color. Use #rrggbb or r,g,b.", input)
            }
            _ => "Color analysis failed. Please try again.".to_string(),
        }
    }
}

fn format_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{} bytes", bytes)
    }
}
