//! Color values and palette derivation
//!
//! This module holds the RGB value type shared across the crate and the
//! deriver turning a base color into recommendations, tone and combinations.

pub mod rgb;
pub mod derive;

pub use rgb::RgbColor;
pub use derive::{ColorCombination, ColorDeriver, ToneFamily, ToneLabel, RECOMMENDATION_NAMES};
