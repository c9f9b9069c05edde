//! Palette derivation from a single base color
//!
//! Three pure steps, all driven by the base color alone:
//! - five recommended colors from fixed channel offsets
//! - a warm/cool tone label from weighted channel scores
//! - three named combinations picked by position from the recommendations

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::RgbColor;
use crate::constants::{offsets, tone};
use crate::PaletteResult;

/// Number of recommended colors
pub const RECOMMENDATION_COUNT: usize = 5;

/// Display names of the recommended colors, in palette order
pub const RECOMMENDATION_NAMES: [&str; RECOMMENDATION_COUNT] =
    ["bright", "muted", "contrast", "warm", "cool"];

/// Combination table: name, palette indices, description
const COMBINATIONS: [(&str, &[usize], &str); 3] = [
    ("paired", &[0, 1], "calm and stable pairing"),
    ("triad", &[0, 2, 4], "vivid and varied combination"),
    ("gradient", &[1, 0, 3], "smoothly flowing natural combination"),
];

/// Coarse warm/cool classification of a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToneLabel {
    #[serde(rename = "warm-warm")]
    WarmWarm,
    #[serde(rename = "warm-soft")]
    WarmSoft,
    #[serde(rename = "cool-cold")]
    CoolCold,
    #[serde(rename = "cool-cool")]
    CoolCool,
}

/// Which side of the warm/cool comparison a tone falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneFamily {
    Warm,
    Cool,
}

impl ToneLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ToneLabel::WarmWarm => "warm-warm",
            ToneLabel::WarmSoft => "warm-soft",
            ToneLabel::CoolCold => "cool-cold",
            ToneLabel::CoolCool => "cool-cool",
        }
    }

    pub fn family(self) -> ToneFamily {
        match self {
            ToneLabel::WarmWarm | ToneLabel::WarmSoft => ToneFamily::Warm,
            ToneLabel::CoolCold | ToneLabel::CoolCool => ToneFamily::Cool,
        }
    }

    /// Human readable sub-label
    pub fn description(self) -> &'static str {
        match self {
            ToneLabel::WarmWarm => "warm family",
            ToneLabel::WarmSoft => "soft family",
            ToneLabel::CoolCold => "cold family",
            ToneLabel::CoolCool => "cool family",
        }
    }
}

impl fmt::Display for ToneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ToneFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneFamily::Warm => f.write_str("warm"),
            ToneFamily::Cool => f.write_str("cool"),
        }
    }
}

/// Named, ordered subset of the recommended colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCombination {
    pub name: String,
    /// Positions in the recommendation sequence
    pub indices: Vec<usize>,
    /// Colors at `indices`, same order
    pub colors: Vec<RgbColor>,
    pub description: String,
}

/// Stateless palette deriver
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorDeriver;

impl ColorDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Apply the five offset formulas in fixed order:
    /// bright, muted, contrast, warm, cool.
    pub fn derive_recommendations(&self, base: RgbColor) -> [RgbColor; RECOMMENDATION_COUNT] {
        offsets::ALL.map(|delta| base.offset(delta))
    }

    /// Classify the base color as warm or cool.
    ///
    /// Equal scores fall through to the cool branch.
    pub fn classify_tone(&self, base: RgbColor) -> ToneLabel {
        let r = f64::from(base.r);
        let g = f64::from(base.g);
        let b = f64::from(base.b);

        let warm_score = r * tone::WARM_RED + g * tone::WARM_GREEN;
        let cool_score = b * tone::COOL_BLUE + g * tone::COOL_GREEN;

        let (r, g, b) = (u16::from(base.r), u16::from(base.g), u16::from(base.b));
        if warm_score > cool_score {
            if r > g + b {
                ToneLabel::WarmWarm
            } else {
                ToneLabel::WarmSoft
            }
        } else if b > r + g {
            ToneLabel::CoolCold
        } else {
            ToneLabel::CoolCool
        }
    }

    /// Build the fixed paired / triad / gradient combinations.
    pub fn build_combinations(
        &self,
        palette: &[RgbColor; RECOMMENDATION_COUNT],
    ) -> [ColorCombination; 3] {
        COMBINATIONS.map(|(name, indices, description)| ColorCombination {
            name: name.to_string(),
            indices: indices.to_vec(),
            colors: indices.iter().map(|&i| palette[i]).collect(),
            description: description.to_string(),
        })
    }

    /// Run all three steps and bundle the outcome
    pub fn derive(&self, base: RgbColor) -> PaletteResult {
        let recommendations = self.derive_recommendations(base);
        let tone = self.classify_tone(base);
        let combinations = self.build_combinations(&recommendations);

        PaletteResult {
            base,
            recommendations,
            tone,
            combinations,
        }
    }
}
