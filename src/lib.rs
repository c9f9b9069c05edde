//! # Tone Palette
//!
//! A Rust crate for deriving color recommendations from an image's dominant color.
//!
//! This library provides:
//! - Upload validation (JPEG, PNG, GIF, WEBP up to 5MB)
//! - Dominant color extraction via modified median cut quantization
//! - Five recommended colors derived by fixed channel offsets
//! - Warm/cool tone classification
//! - Named color combinations drawn from the recommendations
//!
//! ## Example
//!
//! ```rust,no_run
//! use tone_palette::{analyze_image, PaletteResult};
//! use std::path::Path;
//!
//! let result: PaletteResult = analyze_image(Path::new("photo.jpg"))?;
//! println!("Base: {}, tone: {}", result.base, result.tone);
//! # Ok::<(), tone_palette::AnalysisError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod constants;
pub mod config;
pub mod color;
pub mod extraction;
pub mod upload;
pub mod session;

pub use color::{ColorCombination, ColorDeriver, RgbColor, ToneFamily, ToneLabel};
pub use config::PipelineConfig;
pub use error::{AnalysisError, Result};
pub use extraction::{DominantColorExtractor, MedianCutExtractor};
pub use session::AnalysisSession;

/// Complete palette derived from one base color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteResult {
    /// Dominant color the palette was derived from
    pub base: RgbColor,
    /// Bright, muted, contrast, warm and cool variants, in that order
    pub recommendations: [RgbColor; 5],
    /// Warm/cool classification of the base color
    pub tone: ToneLabel,
    /// Paired, triad and gradient combinations, in that order
    pub combinations: [ColorCombination; 3],
}

impl PaletteResult {
    /// Every `#rrggbb` code shown as a swatch: base first, then recommendations
    pub fn hex_codes(&self) -> Vec<String> {
        std::iter::once(self.base)
            .chain(self.recommendations)
            .map(RgbColor::to_hex)
            .collect()
    }
}

/// Derive a palette directly from a base color
pub fn derive_palette(base: RgbColor) -> PaletteResult {
    ColorDeriver::new().derive(base)
}

/// Analyze an image file with the default configuration
///
/// Validates the upload, extracts the dominant color and derives the palette.
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - The file type is not allowed or the file is too large
/// - The file cannot be read
/// - The image cannot be decoded or has no usable pixels
pub fn analyze_image(image_path: &Path) -> Result<PaletteResult> {
    analyze_image_with_config(image_path, &PipelineConfig::default())
}

/// Analyze an image file with an explicit configuration
pub fn analyze_image_with_config(image_path: &Path, config: &PipelineConfig) -> Result<PaletteResult> {
    let mut session = AnalysisSession::new(
        MedianCutExtractor::from_config(&config.extraction),
        config.upload.clone(),
    );
    session.upload(image_path)?;
    session.analyze().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_result_serialization() {
        let result = derive_palette(RgbColor::new(100, 150, 200));

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: PaletteResult = serde_json::from_str(&json).unwrap();

        assert_eq!(result, deserialized);
        assert!(json.contains("\"tone\":\"cool-cool\""));
        assert!(json.contains("\"base\":\"#6496c8\""));
    }

    #[test]
    fn test_hex_codes_order() {
        let result = derive_palette(RgbColor::new(100, 150, 200));
        assert_eq!(
            result.hex_codes(),
            vec!["#6496c8", "#64c8fa", "#4696e6", "#8c6ec8", "#78aaa0", "#3cbef0"]
        );
    }
}
