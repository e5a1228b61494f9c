//! Spectral transform: Hamming window, forward FFT, magnitudes, dominant peak.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::params::calibration::FIRST_USABLE_BIN;
use crate::params::AnalyzerConfig;

/// Strongest component of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DominantPeak {
    /// Bin holding the largest magnitude (never below the first usable bin)
    pub bin: usize,
    /// Peak frequency, refined between neighbouring bins (Hz)
    pub frequency_hz: f32,
    /// Transform magnitude at the peak bin, before calibration
    pub magnitude: f32,
}

/// Stateless per-frame transform with preallocated buffers
pub struct SpectralEngine {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
    bins: Vec<f32>,
    bin_resolution_hz: f32,
    magnitude_divisor: f32,
}

impl SpectralEngine {
    pub fn new(config: &AnalyzerConfig) -> Self {
        let size = config.frame_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch_len = fft.get_inplace_scratch_len();

        Self {
            fft,
            window: (0..size).map(|i| hamming_window(i, size)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            magnitudes: vec![0.0; size],
            bins: vec![0.0; size],
            bin_resolution_hz: config.bin_resolution_hz(),
            magnitude_divisor: config.magnitude_divisor,
        }
    }

    /// Transform one frame. Nothing from earlier frames is carried over.
    ///
    /// Returns the dominant peak; calibrated magnitudes are then available
    /// through [`SpectralEngine::bins`]. A frame of any other length than N
    /// is rejected and leaves the previous results untouched.
    pub fn analyze(&mut self, frame: &[f32]) -> Result<DominantPeak, ConfigError> {
        if frame.len() != self.window.len() {
            return Err(ConfigError::FrameLength {
                expected: self.window.len(),
                got: frame.len(),
            });
        }

        for ((slot, &sample), &weight) in self.buffer.iter_mut().zip(frame).zip(&self.window) {
            *slot = Complex::new(sample * weight, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        for ((magnitude, bin), c) in self
            .magnitudes
            .iter_mut()
            .zip(self.bins.iter_mut())
            .zip(&self.buffer)
        {
            *magnitude = c.norm();
            *bin = *magnitude / self.magnitude_divisor;
        }

        Ok(self.major_peak())
    }

    /// Raw magnitudes of the last frame, one per bin (N values)
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// Magnitudes of the last frame scaled down by the calibration divisor
    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Largest magnitude in `FIRST_USABLE_BIN..=N/2` (Nyquist included)
    fn major_peak(&self) -> DominantPeak {
        let half = self.magnitudes.len() / 2;
        let mut best = FIRST_USABLE_BIN;
        for i in FIRST_USABLE_BIN..=half {
            if self.magnitudes[i] > self.magnitudes[best] {
                best = i;
            }
        }

        let magnitude = self.magnitudes[best];
        let offset = if best > 0 && best + 1 < self.magnitudes.len() {
            parabolic_offset(
                self.magnitudes[best - 1],
                magnitude,
                self.magnitudes[best + 1],
            )
        } else {
            0.0
        };

        DominantPeak {
            bin: best,
            frequency_hz: (best as f32 + offset) * self.bin_resolution_hz,
            magnitude,
        }
    }
}

/// Hamming window function for FFT analysis
pub fn hamming_window(index: usize, size: usize) -> f32 {
    0.54 - 0.46 * ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos()
}

/// Vertex offset of the parabola through three neighbouring bins, in bins (-0.5..=0.5)
fn parabolic_offset(left: f32, centre: f32, right: f32) -> f32 {
    let denom = left - 2.0 * centre + right;
    if denom.abs() <= f32::EPSILON {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
}
