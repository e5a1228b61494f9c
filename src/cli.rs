//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::params::{audio_constants, AnalyzerConfig, Tunables, DEFAULT_GAIN, DEFAULT_SQUELCH};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "bandscope")]
#[command(about = "16-band audio spectrum analyzer", long_about = None)]
pub struct Args {
    /// Replay a WAV file instead of capturing from a microphone
    #[arg(long, value_name = "WAV")]
    pub input: Option<PathBuf>,

    /// Audio input device name (default: host default input)
    #[arg(long, value_name = "NAME", conflicts_with = "input")]
    pub device: Option<String>,

    /// Noise suppression level (0-30)
    #[arg(long, default_value_t = DEFAULT_SQUELCH)]
    pub squelch: u8,

    /// Output gain (0-30)
    #[arg(long, default_value_t = DEFAULT_GAIN)]
    pub gain: u8,

    /// Sample rate requested from the capture device (Hz)
    #[arg(long, value_name = "HZ", default_value_t = audio_constants::SAMPLE_RATE_HZ)]
    pub sample_rate: u32,

    /// Samples per analyzed frame (power of 2, at least 512)
    #[arg(long, value_name = "SAMPLES", default_value_t = audio_constants::FRAME_SIZE)]
    pub frame_size: usize,

    /// How often the band display refreshes (milliseconds)
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub display_interval_ms: u64,
}

impl Args {
    /// Analyzer configuration from the command line, defaults elsewhere
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            sample_rate_hz: self.sample_rate,
            frame_size: self.frame_size,
            ..AnalyzerConfig::default()
        }
    }

    /// Startup squelch and gain (clamped to the control range)
    pub fn tunables(&self) -> Tunables {
        Tunables::new(self.squelch, self.gain)
    }

    pub fn display_interval(&self) -> Duration {
        Duration::from_millis(self.display_interval_ms.max(1))
    }
}
