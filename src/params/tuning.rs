//! Live tunable parameters shared between the control plane and the pipeline.
//!
//! The control plane is the only writer, the pipeline only reads. Values
//! travel through relaxed atomics: a pipeline pass may see a change one
//! frame late, which is fine for a display.

use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::ControlError;

/// Highest squelch the control surface offers
pub const SQUELCH_MAX: u8 = 30;

/// Highest gain the control surface offers
pub const GAIN_MAX: u8 = 30;

/// Squelch on startup (no suppression)
pub const DEFAULT_SQUELCH: u8 = 0;

/// Gain on startup
pub const DEFAULT_GAIN: u8 = 30;

/// Shared squelch and gain
#[derive(Debug)]
pub struct Tunables {
    squelch: AtomicU8,
    gain: AtomicU8,
}

/// Values read once at the start of a post-processing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningSnapshot {
    pub squelch: u8,
    pub gain: u8,
}

impl Default for TuningSnapshot {
    fn default() -> Self {
        Self {
            squelch: DEFAULT_SQUELCH,
            gain: DEFAULT_GAIN,
        }
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self::new(DEFAULT_SQUELCH, DEFAULT_GAIN)
    }
}

impl Tunables {
    pub fn new(squelch: u8, gain: u8) -> Self {
        Self {
            squelch: AtomicU8::new(squelch.min(SQUELCH_MAX)),
            gain: AtomicU8::new(gain.min(GAIN_MAX)),
        }
    }

    pub fn squelch(&self) -> u8 {
        self.squelch.load(Ordering::Relaxed)
    }

    pub fn gain(&self) -> u8 {
        self.gain.load(Ordering::Relaxed)
    }

    /// Set squelch, clamped to `0..=SQUELCH_MAX`. Returns the stored value.
    pub fn set_squelch(&self, squelch: u8) -> u8 {
        let squelch = squelch.min(SQUELCH_MAX);
        self.squelch.store(squelch, Ordering::Relaxed);
        squelch
    }

    /// Set gain, clamped to `0..=GAIN_MAX`. Returns the stored value.
    pub fn set_gain(&self, gain: u8) -> u8 {
        let gain = gain.min(GAIN_MAX);
        self.gain.store(gain, Ordering::Relaxed);
        gain
    }

    pub fn snapshot(&self) -> TuningSnapshot {
        TuningSnapshot {
            squelch: self.squelch(),
            gain: self.gain(),
        }
    }

    /// Apply a control-plane command, returning the command as actually stored
    /// (suitable for echoing back to every control client).
    pub fn apply(&self, command: ControlCommand) -> ControlCommand {
        match command {
            ControlCommand::SetGain(gain) => ControlCommand::SetGain(self.set_gain(gain)),
            ControlCommand::SetSquelch(squelch) => {
                ControlCommand::SetSquelch(self.set_squelch(squelch))
            }
        }
    }
}

/// Control-plane message: a type letter followed by an integer, e.g. `g30` or `s4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    SetGain(u8),
    SetSquelch(u8),
}

impl ControlCommand {
    pub fn parse(message: &str) -> Result<Self, ControlError> {
        let message = message.trim();
        let mut chars = message.chars();
        let kind = chars.next().ok_or(ControlError::Empty)?;
        let raw_value = chars.as_str().trim();

        let value = || {
            // Out-of-range numbers saturate, the setters clamp them afterwards
            raw_value
                .parse::<u32>()
                .map(|v| v.min(u8::MAX as u32) as u8)
                .map_err(|_| ControlError::InvalidValue {
                    kind,
                    value: raw_value.to_string(),
                })
        };

        match kind {
            'g' => Ok(ControlCommand::SetGain(value()?)),
            's' => Ok(ControlCommand::SetSquelch(value()?)),
            other => Err(ControlError::UnknownType(other)),
        }
    }
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlCommand::SetGain(gain) => write!(f, "g{}", gain),
            ControlCommand::SetSquelch(squelch) => write!(f, "s{}", squelch),
        }
    }
}
