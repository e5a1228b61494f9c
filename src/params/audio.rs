//! Audio analysis configuration and constants.

use std::time::Duration;

use super::calibration::{BANDS, FIRST_USABLE_BIN};
use crate::error::ConfigError;

/// Spectrum analysis configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Audio sample rate (Hz)
    /// 10240 Hz with 512-sample frames gives 20 Hz per bin, which the band table assumes
    pub sample_rate_hz: u32,

    /// Frame size in samples (must be power of 2)
    pub frame_size: usize,

    /// Longest wait for a single sample before the slot reuses the previous one
    pub read_timeout: Duration,

    /// Pause taken before every frame fill so other work on the machine gets to run
    pub frame_yield: Duration,

    /// Calibration divisor applied to every magnitude before band aggregation
    pub magnitude_divisor: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: audio_constants::SAMPLE_RATE_HZ,
            frame_size: audio_constants::FRAME_SIZE,
            read_timeout: Duration::from_millis(10),
            frame_yield: Duration::from_millis(1),
            magnitude_divisor: 16.0,
        }
    }
}

impl AnalyzerConfig {
    /// Width of one FFT bin (Hz)
    pub fn bin_resolution_hz(&self) -> f32 {
        self.sample_rate_hz as f32 / self.frame_size as f32
    }

    /// Centre frequency of an FFT bin (Hz)
    pub fn bin_to_hz(&self, bin: f32) -> f32 {
        bin * self.bin_resolution_hz()
    }

    /// Time between two consecutive samples
    pub fn sample_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.sample_rate_hz as f64)
    }

    /// Last bin below Nyquist that bands may use
    pub fn last_usable_bin(&self) -> usize {
        self.frame_size / 2 - 1
    }

    /// Validate configuration (frame size must be power of 2 and hold every band, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_size.is_power_of_two() {
            return Err(ConfigError::FrameSizeNotPowerOfTwo(self.frame_size));
        }
        if self.frame_size / 2 <= FIRST_USABLE_BIN {
            return Err(ConfigError::FrameSizeTooSmall {
                frame_size: self.frame_size,
                band: 0,
                to: BANDS[0].to,
                last_usable: self.frame_size / 2,
            });
        }
        let last_usable = self.last_usable_bin();
        if let Some((band, range)) = BANDS
            .iter()
            .enumerate()
            .find(|(_, range)| range.to > last_usable)
        {
            return Err(ConfigError::FrameSizeTooSmall {
                frame_size: self.frame_size,
                band,
                to: range.to,
                last_usable,
            });
        }
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.read_timeout.is_zero() {
            return Err(ConfigError::ZeroReadTimeout);
        }
        if self.frame_yield.is_zero() {
            return Err(ConfigError::ZeroFrameYield);
        }
        if !self.magnitude_divisor.is_finite() || self.magnitude_divisor <= 0.0 {
            return Err(ConfigError::BadMagnitudeDivisor(self.magnitude_divisor));
        }
        Ok(())
    }
}

/// Audio constants (reference tuning of the band table)
pub mod audio_constants {
    /// Reference sample rate (Hz)
    pub const SAMPLE_RATE_HZ: u32 = 10240;

    /// Reference frame size (samples)
    pub const FRAME_SIZE: usize = 512;

    /// Samples read right after configuration to check whether the input carries signal
    pub const PROBE_BLOCK_SIZE: usize = 64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.validate(), Ok(()));

        // 10240 Hz / 512 samples = 20 Hz per bin
        assert_eq!(config.bin_resolution_hz(), 20.0);
        assert_eq!(config.bin_to_hz(3.0), 60.0);
        assert_eq!(config.last_usable_bin(), 255);
    }

    #[test]
    fn test_rejects_non_power_of_two_frame() {
        let config = AnalyzerConfig {
            frame_size: 500,
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FrameSizeNotPowerOfTwo(500))
        );
    }

    #[test]
    fn test_rejects_frame_too_small_for_bands() {
        let config = AnalyzerConfig {
            frame_size: 256,
            ..AnalyzerConfig::default()
        };
        // Band 13 (111..=147) is the first one past bin 127
        assert_eq!(
            config.validate(),
            Err(ConfigError::FrameSizeTooSmall {
                frame_size: 256,
                band: 13,
                to: 147,
                last_usable: 127
            })
        );

        let tiny = AnalyzerConfig {
            frame_size: 4,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            tiny.validate(),
            Err(ConfigError::FrameSizeTooSmall { .. })
        ));
    }

    #[test]
    fn test_larger_frames_are_accepted() {
        let config = AnalyzerConfig {
            frame_size: 1024,
            ..AnalyzerConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_yield_and_timeout() {
        let no_yield = AnalyzerConfig {
            frame_yield: Duration::ZERO,
            ..AnalyzerConfig::default()
        };
        assert_eq!(no_yield.validate(), Err(ConfigError::ZeroFrameYield));

        let no_timeout = AnalyzerConfig {
            read_timeout: Duration::ZERO,
            ..AnalyzerConfig::default()
        };
        assert_eq!(no_timeout.validate(), Err(ConfigError::ZeroReadTimeout));
    }

    #[test]
    fn test_rejects_bad_divisor_and_rate() {
        let config = AnalyzerConfig {
            magnitude_divisor: 0.0,
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BadMagnitudeDivisor(0.0))
        );

        let config = AnalyzerConfig {
            sample_rate_hz: 0,
            ..AnalyzerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleRate));
    }
}
