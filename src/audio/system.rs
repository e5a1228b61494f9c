//! Pipeline driver and the dedicated thread it runs on.

use log::{debug, error, info, warn};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thread_priority::{set_current_thread_priority, ThreadPriority};

use super::analyzer::Analyzer;
use super::frame::{FillReport, FrameBuffer, SampleClock};
use super::source::{CaptureDevice, SampleSource};
use super::spectrum::{spectrum_channel, Spectrum, SpectrumPublisher, SpectrumReader};
use crate::error::{ConfigError, ReadError, StartError};
use crate::params::{audio_constants::PROBE_BLOCK_SIZE, AnalyzerConfig, Tunables};

/// Running totals kept by the driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub frames: u64,
    pub stale_slots: u64,
    pub degraded_frames: u64,
}

/// One capture → transform → map → post-process → publish pass per [`step`](Self::step).
pub struct PipelineDriver<S: SampleSource> {
    config: AnalyzerConfig,
    source: S,
    frame: FrameBuffer,
    clock: SampleClock,
    analyzer: Analyzer,
    tunables: Arc<Tunables>,
    publisher: SpectrumPublisher,
    stats: DriverStats,
    degraded: bool,
}

impl<S: SampleSource> PipelineDriver<S> {
    pub fn new(
        config: AnalyzerConfig,
        source: S,
        tunables: Arc<Tunables>,
        publisher: SpectrumPublisher,
    ) -> Result<Self, ConfigError> {
        let analyzer = Analyzer::new(&config)?;
        Ok(Self {
            frame: FrameBuffer::new(config.frame_size),
            clock: SampleClock::new(config.sample_period()),
            analyzer,
            config,
            source,
            tunables,
            publisher,
            stats: DriverStats::default(),
            degraded: false,
        })
    }

    /// Run one full pass and publish its result
    pub fn step(&mut self) -> Result<Spectrum, ConfigError> {
        thread::sleep(self.config.frame_yield);

        let report = self
            .frame
            .fill(&mut self.source, self.config.read_timeout, &mut self.clock);
        self.track(report);

        let spectrum = self.process_frame()?;
        self.publisher.publish(spectrum);
        Ok(spectrum)
    }

    /// Transform, map and post-process the current frame buffer
    fn process_frame(&mut self) -> Result<Spectrum, ConfigError> {
        // Tunables are read once per pass, before any band is touched
        let tuning = self.tunables.snapshot();
        let analysis = self.analyzer.analyze(&self.frame, tuning)?;
        let peak = analysis.peak;

        self.stats.frames += 1;
        debug!(
            "Frame {}: peak {:.1}Hz (bin {}, magnitude {:.1})",
            self.stats.frames, peak.frequency_hz, peak.bin, peak.magnitude
        );

        Ok(Spectrum {
            bands: analysis.bands,
            peak,
            frame: self.stats.frames,
        })
    }

    /// Log degraded stretches once on entry and once on recovery
    fn track(&mut self, report: FillReport) {
        let stale = report.stale_slots() as u64;
        self.stats.stale_slots += stale;
        if stale > 0 {
            self.stats.degraded_frames += 1;
            if !self.degraded {
                warn!(
                    "Audio capture: {} of {} samples missing ({} timeouts, {} disconnected), reusing last sample",
                    stale,
                    self.frame.len(),
                    report.timeouts,
                    report.disconnects
                );
            }
        } else if self.degraded {
            info!("Audio capture: samples flowing again");
        }
        self.degraded = stale > 0;
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Loop forever. This is the whole life of the pipeline thread.
    pub fn run(mut self) -> ! {
        loop {
            if let Err(e) = self.step() {
                error!("Spectrum pass failed: {}", e);
            }
        }
    }
}

/// Running analyzer: capture device, pipeline thread, and the handles to talk to it
pub struct AnalyzerSystem<D: CaptureDevice> {
    reader: SpectrumReader,
    tunables: Arc<Tunables>,

    /// Capture device (kept alive while the pipeline reads from it)
    device: D,

    /// Pipeline thread handle (never finishes)
    _pipeline_thread: thread::JoinHandle<()>,
}

impl<D: CaptureDevice> AnalyzerSystem<D> {
    /// Configure the capture device and start the pipeline thread.
    ///
    /// Any configuration failure is returned before a thread exists; there
    /// is no mode that runs without audio.
    pub fn start(
        config: AnalyzerConfig,
        mut device: D,
        tunables: Arc<Tunables>,
    ) -> Result<Self, StartError> {
        config.validate()?;

        let mut source = device.configure(config.sample_rate_hz, config.frame_size)?;
        probe_presence(&mut source, config.read_timeout);

        let (publisher, reader) = spectrum_channel();
        let driver = PipelineDriver::new(config, source, Arc::clone(&tunables), publisher)?;

        let pipeline_thread = thread::Builder::new()
            .name("spectrum".into())
            .spawn(move || {
                if let Err(e) = set_current_thread_priority(ThreadPriority::Max) {
                    warn!("Could not raise spectrum thread priority: {:?}", e);
                }
                info!("Spectrum pipeline started");
                driver.run()
            })?;

        Ok(Self {
            reader,
            tunables,
            device,
            _pipeline_thread: pipeline_thread,
        })
    }

    /// Reader for the latest published spectrum
    pub fn reader(&self) -> SpectrumReader {
        self.reader.clone()
    }

    /// Shared squelch and gain
    pub fn tunables(&self) -> Arc<Tunables> {
        Arc::clone(&self.tunables)
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

/// Read one short block and report whether the input carries any signal
fn probe_presence<S: SampleSource>(source: &mut S, timeout: Duration) -> bool {
    let mut total: u64 = 0;
    let mut read = 0usize;
    for _ in 0..PROBE_BLOCK_SIZE {
        match source.read_sample(timeout) {
            Ok(sample) => {
                total += sample.0.unsigned_abs() as u64;
                read += 1;
            }
            Err(ReadError::Timeout) => continue,
            Err(ReadError::Disconnected) => break,
        }
    }

    let present = total > 0;
    if present {
        info!("Microphone is present ({} of {} probe samples read)", read, PROBE_BLOCK_SIZE);
    } else {
        warn!(
            "Microphone is NOT present or silent ({} of {} probe samples read)",
            read, PROBE_BLOCK_SIZE
        );
    }
    present
}
