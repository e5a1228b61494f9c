//! Parameter definitions with physical units and documented semantics.
//!
//! - Analyzer configuration (sample rate, frame size, timing)
//! - Fixed calibration tables for the 16 output bands
//! - Live tunables written by the control plane

mod audio;
pub mod calibration;
mod tuning;

// Re-export all types
pub use audio::{audio_constants, AnalyzerConfig};
pub use calibration::{BandRange, BAND_CEILING, BAND_COUNT, BANDS};
pub use tuning::{
    ControlCommand, Tunables, TuningSnapshot, DEFAULT_GAIN, DEFAULT_SQUELCH, GAIN_MAX, SQUELCH_MAX,
};
