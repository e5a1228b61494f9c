//! Aggregation of magnitude bins into the 16 display bands.

use crate::error::ConfigError;
use crate::params::calibration::{BandRange, BAND_COUNT, BANDS};
use crate::params::AnalyzerConfig;

/// Band averages before squelch, correction and gain
pub type RawBands = [f32; BAND_COUNT];

/// Sums each band's closed bin range and divides by its tuned divisor
#[derive(Debug, Clone)]
pub struct BandMapper {
    bands: &'static [BandRange; BAND_COUNT],
}

impl BandMapper {
    /// Check that every band fits below Nyquist for the configured frame size
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { bands: &BANDS })
    }

    /// Reduce calibrated magnitude bins to band averages.
    ///
    /// `bins` must reach the last band's upper edge (bin 255).
    pub fn map(&self, bins: &[f32]) -> Result<RawBands, ConfigError> {
        let needed = self.bands[BAND_COUNT - 1].to + 1;
        if bins.len() < needed {
            return Err(ConfigError::TooFewBins {
                needed,
                got: bins.len(),
            });
        }

        let mut raw = [0.0; BAND_COUNT];
        for (value, range) in raw.iter_mut().zip(self.bands.iter()) {
            let sum: f32 = bins[range.from..=range.to].iter().sum();
            *value = sum / range.divisor as f32;
        }
        Ok(raw)
    }
}
