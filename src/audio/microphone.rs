//! Microphone capture through the system audio host.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use super::source::{CaptureDevice, Sample, SampleSource};
use crate::error::{CaptureError, ReadError};

/// Frames worth of samples the capture callback may run ahead of the pipeline
const QUEUE_FRAMES: usize = 4;

/// Default or named audio input device
pub struct Microphone {
    device: cpal::Device,

    /// Input stream (kept alive while the pipeline reads)
    stream: Option<cpal::Stream>,

    /// Samples the callback had to drop because the pipeline fell behind
    dropped: Arc<AtomicU64>,
}

impl Microphone {
    /// Open the named input device, or the host default when `name` is `None`
    pub fn open(name: Option<&str>) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = if let Some(name) = name {
            host.input_devices()?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| CaptureError::DeviceNotFound(name.to_string()))?
        } else {
            host.default_input_device()
                .ok_or(CaptureError::NoInputDevice)?
        };

        info!(
            "Audio capture: using device '{}'",
            device.name().unwrap_or_else(|_| "unknown".into())
        );

        Ok(Self {
            device,
            stream: None,
            dropped: Arc::new(AtomicU64::new(0)),
        })
    }
}

impl CaptureDevice for Microphone {
    type Source = MicrophoneSource;

    fn configure(
        &mut self,
        sample_rate_hz: u32,
        frame_size: usize,
    ) -> Result<MicrophoneSource, CaptureError> {
        if self.stream.is_some() {
            return Err(CaptureError::AlreadyConfigured);
        }

        // Keep the device's native channel layout and read only the first channel
        let channels = self.device.default_input_config()?.channels().max(1);
        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate_hz),
            buffer_size: cpal::BufferSize::Default,
        };

        let (tx, rx) = mpsc::sync_channel::<Sample>(frame_size * QUEUE_FRAMES);
        let dropped = Arc::clone(&self.dropped);

        let stream = self.device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                for frame in data.chunks(channels as usize) {
                    if tx.try_send(Sample::from_f32(frame[0])).is_err() {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                }
            },
            |err| warn!("Audio input stream error: {}", err),
            None,
        )?;
        stream.play()?;

        info!(
            "Audio capture: ready ({}Hz, {} ch, {}-sample frames)",
            sample_rate_hz, channels, frame_size
        );

        self.stream = Some(stream);
        Ok(MicrophoneSource {
            rx,
            dropped: Arc::clone(&self.dropped),
            reported_drops: 0,
            reads: 0,
            check_every: frame_size.max(1),
        })
    }
}

/// Pipeline end of a configured microphone
pub struct MicrophoneSource {
    rx: Receiver<Sample>,
    dropped: Arc<AtomicU64>,
    reported_drops: u64,
    reads: usize,
    /// Drop counter is checked once per frame worth of reads
    check_every: usize,
}

impl MicrophoneSource {
    fn report_drops(&mut self) {
        let dropped = self.dropped.load(Ordering::Relaxed);
        if dropped > self.reported_drops {
            warn!(
                "Audio capture: dropped {} samples",
                dropped - self.reported_drops
            );
            self.reported_drops = dropped;
        }
    }
}

impl SampleSource for MicrophoneSource {
    fn read_sample(&mut self, timeout: Duration) -> Result<Sample, ReadError> {
        match self.rx.recv_timeout(timeout) {
            Ok(sample) => {
                self.reads += 1;
                if self.reads % self.check_every == 0 {
                    self.report_drops();
                }
                Ok(sample)
            }
            Err(RecvTimeoutError::Timeout) => Err(ReadError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(ReadError::Disconnected),
        }
    }
}
