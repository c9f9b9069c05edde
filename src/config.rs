//! Configuration structures for the tone_palette pipeline.
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use tone_palette::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), tone_palette::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`UploadConfig`]: accepted MIME types and size ceiling
//! - [`ExtractionConfig`]: dominant color quantizer settings
//!
//! Missing fields fall back to their defaults, so a partial file such as
//! `{"extraction": {"quality": 1}}` is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{quantize, upload};
use crate::{AnalysisError, Result};

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upload validation
    pub upload: UploadConfig,

    /// Dominant color extraction
    pub extraction: ExtractionConfig,
}

/// Upload validation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum file size in bytes
    pub max_file_size: u64,

    /// Accepted MIME types
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: upload::MAX_FILE_SIZE,
            allowed_types: upload::ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl UploadConfig {
    pub fn allows(&self, mime: &str) -> bool {
        self.allowed_types.iter().any(|t| t.eq_ignore_ascii_case(mime))
    }
}

/// Dominant color extraction parameters.
///
/// Controls pixel sampling and the size of the quantized palette the
/// dominant color is taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sample every n-th pixel (1 = every pixel)
    pub quality: u32,

    /// Palette size used for quantization (clamped to 2..=20)
    pub color_count: usize,

    /// Skip near-white pixels
    pub ignore_white: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            quality: quantize::DEFAULT_QUALITY,
            color_count: quantize::DEFAULT_COLOR_COUNT,
            ignore_white: true,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("cannot read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::config(format!("cannot parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("cannot write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.extraction.quality == 0 {
            return Err(AnalysisError::ConfigError {
                message: "extraction.quality must be at least 1".into(),
                source: None,
            });
        }
        if self.upload.allowed_types.is_empty() {
            return Err(AnalysisError::ConfigError {
                message: "upload.allowed_types must not be empty".into(),
                source: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.upload.max_file_size, 5 * 1024 * 1024);
        assert_eq!(config.upload.allowed_types.len(), 4);
        assert_eq!(config.extraction.quality, 10);
        assert_eq!(config.extraction.color_count, 5);
        assert!(config.extraction.ignore_white);
    }

    #[test]
    fn test_allows_is_case_insensitive() {
        let upload = UploadConfig::default();
        assert!(upload.allows("image/png"));
        assert!(upload.allows("IMAGE/WEBP"));
        assert!(!upload.allows("image/bmp"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"extraction": {"quality": 1}}"#).unwrap();
        assert_eq!(config.extraction.quality, 1);
        assert_eq!(config.extraction.color_count, 5);
        assert_eq!(config.upload, UploadConfig::default());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PipelineConfig::default();
        config.upload.max_file_size = 1024;
        config.to_json_file(&path).unwrap();

        let loaded = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_files_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = PipelineConfig::from_json_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(AnalysisError::ConfigError { .. })));

        let zero_quality = dir.path().join("zero.json");
        std::fs::write(&zero_quality, r#"{"extraction": {"quality": 0}}"#).unwrap();
        let result = PipelineConfig::from_json_file(&zero_quality);
        assert!(matches!(result, Err(AnalysisError::ConfigError { .. })));
    }
}
