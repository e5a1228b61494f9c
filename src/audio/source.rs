//! Capture device and sample source contracts.

use std::time::Duration;

use crate::error::{CaptureError, ReadError};

/// One instantaneous microphone reading.
///
/// Digital microphones deliver a 32-bit word with the audio in the upper
/// bits; the low 16 bits are unused and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sample(pub i16);

impl Sample {
    pub const SILENCE: Sample = Sample(0);

    /// Take the amplitude out of a left-justified 32-bit capture word
    pub fn from_word(word: i32) -> Self {
        Sample((word >> 16) as i16)
    }

    /// Convert a normalized float sample (-1.0..=1.0) as produced by sound cards
    pub fn from_f32(value: f32) -> Self {
        let word = (value.clamp(-1.0, 1.0) as f64 * i32::MAX as f64) as i32;
        Self::from_word(word)
    }

    pub fn amplitude(self) -> f32 {
        self.0 as f32
    }
}

/// Blocking producer of samples at a fixed rate.
pub trait SampleSource: Send + 'static {
    /// Wait at most `timeout` for the next sample
    fn read_sample(&mut self, timeout: Duration) -> Result<Sample, ReadError>;

    /// Whether the source itself delivers samples at the sample rate.
    /// Unclocked sources (file replay) are paced by the driver.
    fn is_clocked(&self) -> bool {
        true
    }
}

/// Hardware (or replay) endpoint that has to be configured before sampling.
///
/// The device must stay alive for as long as its source is read from.
pub trait CaptureDevice {
    type Source: SampleSource;

    /// Attach to the device for the given sample rate and frame size
    fn configure(
        &mut self,
        sample_rate_hz: u32,
        frame_size: usize,
    ) -> Result<Self::Source, CaptureError>;
}
