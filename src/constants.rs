//! Fixed parameters for palette derivation, upload validation and extraction
//!
//! The derivation offsets and tone weights are part of the output contract:
//! changing any of them changes every palette produced.

/// Channel offsets `(dr, dg, db)` for the five recommended colors, in order.
pub mod offsets {
    pub const BRIGHT: [i16; 3] = [0, 50, 50];
    pub const MUTED: [i16; 3] = [-30, 0, 30];
    pub const CONTRAST: [i16; 3] = [40, -40, 0];
    pub const WARM: [i16; 3] = [20, 20, -40];
    pub const COOL: [i16; 3] = [-40, 40, 40];

    /// All offsets in palette order
    pub const ALL: [[i16; 3]; 5] = [BRIGHT, MUTED, CONTRAST, WARM, COOL];
}

/// Channel weights for the warm/cool comparison
pub mod tone {
    /// warm score = r * WARM_RED + g * WARM_GREEN
    pub const WARM_RED: f64 = 0.8;
    pub const WARM_GREEN: f64 = 0.2;

    /// cool score = b * COOL_BLUE + g * COOL_GREEN
    pub const COOL_BLUE: f64 = 0.6;
    pub const COOL_GREEN: f64 = 0.4;
}

/// Upload limits
pub mod upload {
    /// Maximum accepted file size (5MB)
    pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

    /// Accepted MIME types
    pub const ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];
}

/// Modified median cut quantization parameters
pub mod quantize {
    /// Significant bits kept per channel
    pub const SIGBITS: u32 = 5;

    /// Shift applied to 8-bit channels
    pub const RSHIFT: u32 = 8 - SIGBITS;

    /// Histogram cells per axis
    pub const AXIS_CELLS: usize = 1 << SIGBITS;

    /// Upper bound on box splitting iterations
    pub const MAX_ITERATIONS: usize = 1000;

    /// Share of the target color count reached by population splitting
    pub const FRACT_BY_POPULATION: f64 = 0.75;

    /// Default pixel sampling step
    pub const DEFAULT_QUALITY: u32 = 10;

    /// Default palette size the dominant color is picked from
    pub const DEFAULT_COLOR_COUNT: usize = 5;

    pub const MIN_COLOR_COUNT: usize = 2;
    pub const MAX_COLOR_COUNT: usize = 20;

    /// Pixels below this alpha are skipped
    pub const MIN_ALPHA: u8 = 125;

    /// Pixels with every channel above this are treated as white
    pub const WHITE_THRESHOLD: u8 = 250;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_order() {
        assert_eq!(offsets::ALL[0], offsets::BRIGHT);
        assert_eq!(offsets::ALL[4], offsets::COOL);
    }

    #[test]
    fn test_tone_weights_sum_to_one() {
        assert!((tone::WARM_RED + tone::WARM_GREEN - 1.0).abs() < 1e-12);
        assert!((tone::COOL_BLUE + tone::COOL_GREEN - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantize_ranges() {
        assert_eq!(quantize::AXIS_CELLS, 32);
        assert!(quantize::MIN_COLOR_COUNT <= quantize::DEFAULT_COLOR_COUNT);
        assert!(quantize::DEFAULT_COLOR_COUNT <= quantize::MAX_COLOR_COUNT);
        assert_eq!(upload::MAX_FILE_SIZE, 5_242_880);
    }
}
