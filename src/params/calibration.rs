//! Fixed calibration tables for the 16-band display.
//!
//! These values were tuned by ear against an INMP441 microphone at 10240 Hz
//! with 512-sample frames (20 Hz per bin). They are data, not derived
//! quantities: band divisors are not always the width of the range, and
//! several neighbouring ranges share a boundary bin.

/// Number of output bands
pub const BAND_COUNT: usize = 16;

/// Bins 0..=2 carry DC and windowing artifacts and are never aggregated
pub const FIRST_USABLE_BIN: usize = 3;

/// Closed range of magnitude bins aggregated into one band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandRange {
    /// First bin (inclusive)
    pub from: usize,
    /// Last bin (inclusive)
    pub to: usize,
    /// Tuned averaging divisor
    pub divisor: u16,
}

const fn band(from: usize, to: usize, divisor: u16) -> BandRange {
    BandRange { from, to, divisor }
}

/// Bin ranges and divisors, low to high
pub const BANDS: [BandRange; BAND_COUNT] = [
    band(3, 4, 2),      // 60 - 100 Hz
    band(4, 5, 2),      // 80 - 120 Hz
    band(5, 7, 3),      // 100 - 160 Hz
    band(7, 9, 3),      // 140 - 200 Hz
    band(9, 12, 4),     // 180 - 260 Hz
    band(12, 16, 5),    // 240 - 340 Hz
    band(16, 21, 6),    // 320 - 440 Hz
    band(21, 28, 8),    // 420 - 600 Hz
    band(29, 37, 10),   // 580 - 760 Hz
    band(37, 48, 12),   // 740 - 980 Hz
    band(48, 64, 17),   // 960 - 1300 Hz
    band(64, 84, 21),   // 1280 - 1700 Hz
    band(84, 111, 28),  // 1680 - 2240 Hz
    band(111, 147, 37), // 2220 - 2960 Hz
    band(147, 194, 48), // 2940 - 3900 Hz
    band(194, 255, 62), // 3880 - 5120 Hz
];

/// Per-band noise floor weights, multiplied by squelch / 4.
/// Ambient noise is strongest at the low end.
pub const NOISE_FLOOR: [u16; BAND_COUNT] = [34, 28, 26, 25, 20, 12, 9, 6, 4, 4, 3, 2, 2, 2, 2, 2];

/// Per-band multipliers flattening the microphone's frequency response
pub const TONAL_CORRECTION: [f32; BAND_COUNT] = [
    1.70, 1.71, 1.73, 1.78, 1.68, 1.56, 1.55, 1.63, 1.79, 1.62, 1.80, 2.06, 2.47, 3.35, 6.83, 9.55,
];

/// Highest band value handed to consumers
pub const BAND_CEILING: u8 = 254;
