//! Dominant color extraction
//!
//! The palette pipeline only needs one color per image. Where that color
//! comes from is behind [`DominantColorExtractor`], so decoding and
//! quantization choices never reach the derivation code.

pub mod median_cut;

use image::DynamicImage;

use crate::{color::RgbColor, Result};

pub use median_cut::{MedianCutExtractor, PaletteEntry};

/// Something that can pick the most representative color of an image
pub trait DominantColorExtractor {
    /// Return the dominant color of a fully decoded image
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ExtractionError` when the image has no usable pixels
    fn extract_dominant_color(&self, image: &DynamicImage) -> Result<RgbColor>;
}

impl<E: DominantColorExtractor + ?Sized> DominantColorExtractor for &E {
    fn extract_dominant_color(&self, image: &DynamicImage) -> Result<RgbColor> {
        (**self).extract_dominant_color(image)
    }
}

impl<E: DominantColorExtractor + ?Sized> DominantColorExtractor for Box<E> {
    fn extract_dominant_color(&self, image: &DynamicImage) -> Result<RgbColor> {
        (**self).extract_dominant_color(image)
    }
}
