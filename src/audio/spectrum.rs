//! Published spectrum state shared between the pipeline thread and consumers.
//!
//! The pipeline owns the only [`SpectrumPublisher`]; every write hands over
//! a complete [`Spectrum`] through a triple buffer, so the producer never
//! waits and a reader never sees a half-updated band set.

use std::sync::{Arc, Mutex, PoisonError};
use triple_buffer::TripleBuffer;

use super::fft::DominantPeak;
use super::post::BandValues;
use crate::params::calibration::BAND_COUNT;

/// Result of one pipeline pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spectrum {
    /// Post-processed band values, low to high
    pub bands: BandValues,
    /// Strongest component of the frame
    pub peak: DominantPeak,
    /// Pipeline pass that produced this result (0 = nothing published yet)
    pub frame: u64,
}

impl Spectrum {
    pub fn is_silent(&self) -> bool {
        self.bands.iter().all(|&b| b == 0)
    }
}

/// Create a connected publisher / reader pair, starting from an all-zero spectrum
pub fn spectrum_channel() -> (SpectrumPublisher, SpectrumReader) {
    let (input, output) = TripleBuffer::new(&Spectrum::default()).split();
    (
        SpectrumPublisher { input },
        SpectrumReader {
            output: Arc::new(Mutex::new(output)),
        },
    )
}

/// Producer half (pipeline thread writes to this)
pub struct SpectrumPublisher {
    input: triple_buffer::Input<Spectrum>,
}

impl SpectrumPublisher {
    /// Publish a complete result. Wait-free.
    pub fn publish(&mut self, spectrum: Spectrum) {
        self.input.write(spectrum);
    }
}

/// Cloneable consumer half (render / control threads read from this).
///
/// Readers only contend with each other, never with the publisher. Polling
/// faster than the pipeline produces returns the same result again.
#[derive(Clone)]
pub struct SpectrumReader {
    output: Arc<Mutex<triple_buffer::Output<Spectrum>>>,
}

impl SpectrumReader {
    /// Latest complete result
    pub fn latest(&self) -> Spectrum {
        // A poisoned lock still guards a whole value, keep reading
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        *output.read()
    }

    /// Latest 16 band values
    pub fn latest_bands(&self) -> [u8; BAND_COUNT] {
        self.latest().bands
    }

    /// Latest dominant frequency and its magnitude
    pub fn dominant_frequency(&self) -> (f32, f32) {
        let peak = self.latest().peak;
        (peak.frequency_hz, peak.magnitude)
    }
}
