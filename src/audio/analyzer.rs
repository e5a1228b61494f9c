//! Frame → band values, without any capture or threading.

use super::bands::{BandMapper, RawBands};
use super::fft::{DominantPeak, SpectralEngine};
use super::frame::FrameBuffer;
use super::post::{BandValues, PostProcessor};
use crate::error::ConfigError;
use crate::params::{AnalyzerConfig, TuningSnapshot};

/// Output of one analyzed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAnalysis {
    pub raw: RawBands,
    pub bands: BandValues,
    pub peak: DominantPeak,
}

/// Transform, band mapping and post-processing, strictly in that order
pub struct Analyzer {
    engine: SpectralEngine,
    mapper: BandMapper,
    post: PostProcessor,
}

impl Analyzer {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            mapper: BandMapper::new(config)?,
            engine: SpectralEngine::new(config),
            post: PostProcessor::new(),
        })
    }

    /// Analyze a full frame. Frames of the wrong length are rejected
    /// instead of being transformed.
    pub fn analyze(
        &mut self,
        frame: &FrameBuffer,
        tuning: TuningSnapshot,
    ) -> Result<FrameAnalysis, ConfigError> {
        let peak = self.engine.analyze(frame.as_slice())?;
        let raw = self.mapper.map(self.engine.bins())?;
        let bands = self.post.process(&raw, tuning);
        Ok(FrameAnalysis { raw, bands, peak })
    }
}
