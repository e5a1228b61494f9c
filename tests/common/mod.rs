//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use bandscope::audio::{CaptureDevice, Sample, SampleSource, SpectrumReader};
use bandscope::error::{CaptureError, ReadError};

pub const SAMPLE_RATE_HZ: u32 = 10240;
pub const FRAME_SIZE: usize = 512;

/// One frame of a sine wave, rounded to whole sample values.
/// 500 Hz fits exactly 25 cycles into 512 samples, so the frame loops cleanly.
pub fn sine(frequency_hz: f32, amplitude: f32, len: usize) -> Vec<i16> {
    (0..len)
        .map(|n| {
            let t = n as f32 / SAMPLE_RATE_HZ as f32;
            (amplitude * (2.0 * PI * frequency_hz * t).sin()).round() as i16
        })
        .collect()
}

pub fn amplitudes(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32).collect()
}

/// Capture device replaying a fixed sample script in a loop
pub struct ScriptedDevice {
    pub script: Vec<i16>,
    pub configured_with: Option<(u32, usize)>,
}

impl ScriptedDevice {
    pub fn new(script: Vec<i16>) -> Self {
        Self {
            script,
            configured_with: None,
        }
    }
}

impl CaptureDevice for ScriptedDevice {
    type Source = ScriptedSource;

    fn configure(
        &mut self,
        sample_rate_hz: u32,
        frame_size: usize,
    ) -> Result<Self::Source, CaptureError> {
        if self.configured_with.is_some() {
            return Err(CaptureError::AlreadyConfigured);
        }
        self.configured_with = Some((sample_rate_hz, frame_size));
        Ok(ScriptedSource {
            script: self.script.clone(),
            position: 0,
        })
    }
}

pub struct ScriptedSource {
    script: Vec<i16>,
    position: usize,
}

impl SampleSource for ScriptedSource {
    fn read_sample(&mut self, _timeout: Duration) -> Result<Sample, ReadError> {
        if self.script.is_empty() {
            return Err(ReadError::Disconnected);
        }
        let sample = Sample(self.script[self.position]);
        self.position = (self.position + 1) % self.script.len();
        Ok(sample)
    }
}

/// Device whose configuration always fails
pub struct BrokenDevice;

impl CaptureDevice for BrokenDevice {
    type Source = ScriptedSource;

    fn configure(&mut self, _: u32, _: usize) -> Result<Self::Source, CaptureError> {
        Err(CaptureError::NoInputDevice)
    }
}

/// Poll until a result at or after `frame` is published
pub fn wait_for_frame(reader: &SpectrumReader, frame: u64, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if reader.latest().frame >= frame {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    false
}
