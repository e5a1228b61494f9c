//! Audio capture and spectrum analysis.
//!
//! Samples flow from a capture device into 512-sample frames, through a
//! Hamming-windowed FFT, into 16 calibrated bands, and out to consumers
//! through a lock-free published state.

mod analyzer;
mod bands;
mod fft;
mod frame;
mod microphone;
mod post;
mod source;
mod spectrum;
mod system;
mod wav;

// Re-export public types
pub use analyzer::{Analyzer, FrameAnalysis};
pub use bands::{BandMapper, RawBands};
pub use fft::{hamming_window, DominantPeak, SpectralEngine};
pub use frame::{FillReport, FrameBuffer, SampleClock};
pub use microphone::{Microphone, MicrophoneSource};
pub use post::{BandValues, PostProcessor};
pub use source::{CaptureDevice, Sample, SampleSource};
pub use spectrum::{spectrum_channel, Spectrum, SpectrumPublisher, SpectrumReader};
pub use system::{AnalyzerSystem, DriverStats, PipelineDriver};
pub use wav::{WavFile, WavSource};
