//! 8-bit RGB color value
//!
//! `RgbColor` is the unit every other module speaks: the extractor produces
//! one, the deriver transforms it, and the output exposes it as `#rrggbb`.

use std::fmt;
use std::str::FromStr;

use palette::{FromColor, Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, Result};

/// Immutable red/green/blue triplet, each channel in [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Add a signed delta to each channel, clamping to [0, 255]
    pub fn offset(self, delta: [i16; 3]) -> Self {
        Self {
            r: clamp_channel(self.r, delta[0]),
            g: clamp_channel(self.g, delta[1]),
            b: clamp_channel(self.b, delta[2]),
        }
    }

    /// Lowercase, zero-padded `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` or `rrggbb` (either case)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(AnalysisError::invalid_color(
                hex,
                format!("expected 6 hex digits, got {}", digits.chars().count()),
            ));
        }
        // from_str_radix tolerates a leading '+', so check digits up front
        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(AnalysisError::invalid_color(hex, "non-hex digit"));
        }

        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16).map_err(|e| {
                AnalysisError::invalid_color(hex, format!("invalid {} value: {}", name, e))
            })
        };

        Ok(Self {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Parse a comma separated `r,g,b` triplet of decimal integers
    pub fn from_triplet(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(AnalysisError::invalid_color(
                input,
                format!("expected 3 channels, got {}", parts.len()),
            ));
        }

        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse::<u8>().map_err(|e| {
                AnalysisError::invalid_color(input, format!("channel '{}': {}", part, e))
            })?;
        }

        Ok(Self::new(channels[0], channels[1], channels[2]))
    }

    /// CIE Lab coordinates (D65) for perceptual reporting
    pub fn to_lab(self) -> Lab {
        let srgb: Srgb<f32> = Srgb::new(self.r, self.g, self.b).into_format();
        Lab::from_color(srgb)
    }
}

fn clamp_channel(value: u8, delta: i16) -> u8 {
    i16::from(value).saturating_add(delta).clamp(0, 255) as u8
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Accepts `#rrggbb`, `rrggbb` or `r,g,b`
impl FromStr for RgbColor {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        if s.contains(',') {
            Self::from_triplet(s)
        } else {
            Self::from_hex(s)
        }
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for RgbColor {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Srgb<u8>> for RgbColor {
    fn from(srgb: Srgb<u8>) -> Self {
        Self::new(srgb.red, srgb.green, srgb.blue)
    }
}

impl From<RgbColor> for Srgb<u8> {
    fn from(color: RgbColor) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_hex_lowercase_zero_padded() {
        assert_eq!(RgbColor::new(255, 0, 0).to_hex(), "#ff0000");
        assert_eq!(RgbColor::new(1, 2, 3).to_hex(), "#010203");
        assert_eq!(RgbColor::new(171, 205, 239).to_string(), "#abcdef");
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(RgbColor::from_hex("#FF8000").unwrap(), RgbColor::new(255, 128, 0));
        assert_eq!(RgbColor::from_hex("0a0b0c").unwrap(), RgbColor::new(10, 11, 12));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(RgbColor::from_hex("#FF").is_err());
        assert!(RgbColor::from_hex("#GGGGGG").is_err());
        assert!(RgbColor::from_hex("#ff00ff00").is_err());
        assert!(RgbColor::from_hex("#ééé").is_err());
        // at most one leading '#'
        assert!(RgbColor::from_hex("##6496c8").is_err());
        assert!("##6496c8".parse::<RgbColor>().is_err());
    }

    #[test]
    fn test_from_str_accepts_triplets() {
        let color: RgbColor = "100, 150, 200".parse().unwrap();
        assert_eq!(color, RgbColor::new(100, 150, 200));

        assert!("100,150".parse::<RgbColor>().is_err());
        assert!("100,150,256".parse::<RgbColor>().is_err());
        assert!("#6496c8".parse::<RgbColor>().is_ok());
    }

    #[test]
    fn test_offset_clamps() {
        let color = RgbColor::new(250, 5, 128);
        assert_eq!(color.offset([40, -40, 0]), RgbColor::new(255, 0, 128));
        assert_eq!(color.offset([-255, 255, -128]), RgbColor::new(0, 255, 0));
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let json = serde_json::to_string(&RgbColor::new(100, 150, 200)).unwrap();
        assert_eq!(json, "\"#6496c8\"");

        let parsed: RgbColor = serde_json::from_str("\"#6496C8\"").unwrap();
        assert_eq!(parsed, RgbColor::new(100, 150, 200));
        assert!(serde_json::from_str::<RgbColor>("\"blue\"").is_err());
    }

    #[test]
    fn test_to_lab_extremes() {
        let black = RgbColor::new(0, 0, 0).to_lab();
        assert!(black.l < 1.0);

        let white = RgbColor::new(255, 255, 255).to_lab();
        assert!(white.l > 99.0);
        assert!(white.a.abs() < 1.0);
        assert!(white.b.abs() < 1.0);
    }

    #[test]
    fn test_srgb_conversion() {
        let color = RgbColor::new(12, 34, 56);
        let srgb: Srgb<u8> = color.into();
        assert_eq!(RgbColor::from(srgb), color);
    }

    proptest! {
        #[test]
        fn hex_round_trips(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = RgbColor::new(r, g, b);
            let hex = color.to_hex();
            prop_assert_eq!(hex.len(), 7);
            prop_assert_eq!(RgbColor::from_hex(&hex).unwrap(), color);
        }

        #[test]
        fn offset_matches_saturating_arithmetic(
            r in any::<u8>(), g in any::<u8>(), b in any::<u8>(),
            dr in -300i16..300, dg in -300i16..300, db in -300i16..300,
        ) {
            let shifted = RgbColor::new(r, g, b).offset([dr, dg, db]);
            prop_assert_eq!(i32::from(shifted.r), (i32::from(r) + i32::from(dr)).clamp(0, 255));
            prop_assert_eq!(i32::from(shifted.g), (i32::from(g) + i32::from(dg)).clamp(0, 255));
            prop_assert_eq!(i32::from(shifted.b), (i32::from(b) + i32::from(db)).clamp(0, 255));
        }
    }
}
