//! Bandscope library - microphone to 16-band loudness spectrum

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;
