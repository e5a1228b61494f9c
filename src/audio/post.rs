//! Post-processing of raw band averages into display values.
//!
//! Per band, in order: squelch, tonal correction, gain, clamp. The gain
//! step is `v * gain / 40 + v / 16`; both terms are part of the tuning.

use super::bands::RawBands;
use crate::params::calibration::{BAND_CEILING, BAND_COUNT, NOISE_FLOOR, TONAL_CORRECTION};
use crate::params::TuningSnapshot;

/// Final per-band values in `0..=254`
pub type BandValues = [u8; BAND_COUNT];

#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcessor;

impl PostProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Run every stage over all 16 bands and return the complete set
    pub fn process(&self, raw: &RawBands, tuning: TuningSnapshot) -> BandValues {
        let mut out = [0u8; BAND_COUNT];
        for (band, value) in out.iter_mut().enumerate() {
            let v = squelch(raw[band], band, tuning.squelch);
            let v = v * TONAL_CORRECTION[band];
            let v = apply_gain(v, tuning.gain);
            *value = clamp_to_band(v);
        }
        out
    }
}

/// Zero a band whose average does not rise above its scaled noise floor
fn squelch(value: f32, band: usize, squelch: u8) -> f32 {
    let floor = squelch as f32 * NOISE_FLOOR[band] as f32 / 4.0;
    if value - floor <= 0.0 {
        0.0
    } else {
        value
    }
}

fn apply_gain(value: f32, gain: u8) -> f32 {
    value * gain as f32 / 40.0 + value / 16.0
}

fn clamp_to_band(value: f32) -> u8 {
    // Float to int casts saturate and map NaN to 0
    (value as i32).clamp(0, BAND_CEILING as i32) as u8
}
