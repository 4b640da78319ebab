//! Input sample buffer

use crate::error::{AnalysisError, Result};

/// Shortest take accepted for analysis, in seconds.
pub const MIN_ANALYSIS_DURATION_SECS: f32 = 0.1;

/// Borrowed view over one mono take: samples in [-1, 1] plus sample rate.
///
/// The capture collaborator owns the samples; the core borrows them for a
/// single analysis call and holds no reference afterward.
#[derive(Debug, Clone, Copy)]
pub struct SampleBuffer<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

impl<'a> SampleBuffer<'a> {
    /// Validate and wrap a sample slice. Empty input, a zero sample rate, or
    /// a take shorter than [`MIN_ANALYSIS_DURATION_SECS`] is rejected before
    /// any computation begins.
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "sample rate must be positive".to_string(),
            ));
        }
        if samples.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "empty sample buffer".to_string(),
            ));
        }

        let min_len = (MIN_ANALYSIS_DURATION_SECS * sample_rate as f32) as usize;
        if samples.len() < min_len {
            return Err(AnalysisError::InvalidInput(format!(
                "buffer too short: {} samples, need at least {}",
                samples.len(),
                min_len
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
