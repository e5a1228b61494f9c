//! Error types shared across the capture, configuration and control paths.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid analyzer configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("frame size must be a power of 2, got {0}")]
    FrameSizeNotPowerOfTwo(usize),

    #[error("frame size {frame_size} is too small: band {band} reaches bin {to}, usable bins end at {last_usable}")]
    FrameSizeTooSmall {
        frame_size: usize,
        band: usize,
        to: usize,
        last_usable: usize,
    },

    #[error("sample rate must be > 0")]
    ZeroSampleRate,

    #[error("sample read timeout must be > 0")]
    ZeroReadTimeout,

    #[error("frame yield must be > 0, the pipeline thread must give way between frames")]
    ZeroFrameYield,

    #[error("magnitude divisor must be finite and > 0, got {0}")]
    BadMagnitudeDivisor(f32),

    #[error("frame holds {got} samples, analyzer expects {expected}")]
    FrameLength { expected: usize, got: usize },

    #[error("band mapping needs {needed} magnitude bins, got {got}")]
    TooFewBins { needed: usize, got: usize },
}

/// Failure to attach to or configure a capture device. Always fatal.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no default audio input device")]
    NoInputDevice,

    #[error("audio input device '{0}' not found")]
    DeviceNotFound(String),

    #[error("failed to enumerate audio input devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query input configuration: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to read WAV file {0}: {1}")]
    Wav(PathBuf, hound::Error),

    #[error("WAV file {0} contains no samples")]
    EmptyWav(PathBuf),

    #[error("capture device is already configured")]
    AlreadyConfigured,
}

/// Failure to deliver a single sample. Recovered locally by the frame fill.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    #[error("timed out waiting for a sample")]
    Timeout,

    #[error("capture stream disconnected")]
    Disconnected,
}

/// Reasons the pipeline could not be started.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("capture device configuration failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("failed to spawn pipeline thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Malformed control-plane message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("empty control message")]
    Empty,

    #[error("unknown control message type '{0}'")]
    UnknownType(char),

    #[error("invalid value '{value}' for control message '{kind}'")]
    InvalidValue { kind: char, value: String },
}
