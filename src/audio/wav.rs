//! WAV file replay, standing in for a microphone.

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::source::{CaptureDevice, Sample, SampleSource};
use crate::error::{CaptureError, ReadError};

/// WAV file played back in a loop through the pipeline
pub struct WavFile {
    path: PathBuf,
}

impl WavFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Decode the first channel of the file into samples
    fn decode(&self) -> Result<(hound::WavSpec, Vec<Sample>), CaptureError> {
        let wav_err = |e| CaptureError::Wav(self.path.clone(), e);
        let mut reader = hound::WavReader::open(&self.path).map_err(wav_err)?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .step_by(channels)
                .map(|s| s.map(Sample::from_f32))
                .collect::<Result<Vec<_>, _>>(),
            hound::SampleFormat::Int => {
                // Left-justify into a 32-bit word like the hardware does
                let shift = 32u32.saturating_sub(spec.bits_per_sample as u32);
                reader
                    .samples::<i32>()
                    .step_by(channels)
                    .map(|s| s.map(|v| Sample::from_word(v << shift)))
                    .collect::<Result<Vec<_>, _>>()
            }
        }
        .map_err(wav_err)?;

        Ok((spec, samples))
    }
}

impl CaptureDevice for WavFile {
    type Source = WavSource;

    fn configure(
        &mut self,
        sample_rate_hz: u32,
        frame_size: usize,
    ) -> Result<WavSource, CaptureError> {
        let (spec, samples) = self.decode()?;
        if samples.is_empty() {
            return Err(CaptureError::EmptyWav(self.path.clone()));
        }

        if spec.sample_rate != sample_rate_hz {
            warn!(
                "WAV replay: {} is recorded at {}Hz but analyzed as {}Hz, band frequencies will shift",
                self.path.display(),
                spec.sample_rate,
                sample_rate_hz
            );
        }
        info!(
            "WAV replay: {} ({} samples, {} frames of {})",
            self.path.display(),
            samples.len(),
            samples.len() / frame_size.max(1),
            frame_size
        );

        Ok(WavSource {
            samples,
            position: 0,
        })
    }
}

/// Looping cursor over decoded WAV samples
pub struct WavSource {
    samples: Vec<Sample>,
    position: usize,
}

impl SampleSource for WavSource {
    fn read_sample(&mut self, _timeout: Duration) -> Result<Sample, ReadError> {
        let sample = self.samples[self.position];
        self.position = (self.position + 1) % self.samples.len();
        Ok(sample)
    }

    fn is_clocked(&self) -> bool {
        false
    }
}
