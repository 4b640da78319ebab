//! Pitch estimation and per-take pitch statistics

use log::debug;
use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector;
use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, FrequencyRange};
use crate::core::buffer::SampleBuffer;
use crate::core::dsp::stats;
use crate::error::{AnalysisError, Result};

/// Normalized correlation a lag peak must reach to count as voiced.
const VOICING_THRESHOLD: f32 = 0.3;
/// Frames quieter than this RMS are treated as unvoiced outright.
const SILENCE_RMS: f32 = 1e-4;

/// Per-frame pitch estimator collaborator.
///
/// Implementations return the estimated fundamental in Hz, or 0.0 for an
/// unvoiced frame. `&mut self` lets detector implementations keep scratch
/// buffers between frames.
pub trait PitchEstimator {
    fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> f32;
}

/// Closures serve as estimators, which keeps tests and callers with exotic
/// detectors away from newtype boilerplate.
impl<F> PitchEstimator for F
where
    F: FnMut(&[f32], u32) -> f32,
{
    fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> f32 {
        self(frame, sample_rate)
    }
}

/// Autocorrelation pitch estimator, the default collaborator.
///
/// Picks the strongest normalized-autocorrelation peak whose lag falls in
/// the configured pitch band; a frame is unvoiced when that peak stays
/// below [`VOICING_THRESHOLD`] or the frame is near silence.
#[derive(Debug, Clone)]
pub struct AutocorrelationPitchEstimator {
    band: FrequencyRange,
}

impl AutocorrelationPitchEstimator {
    pub fn new(band: FrequencyRange) -> Self {
        Self { band }
    }
}

impl Default for AutocorrelationPitchEstimator {
    fn default() -> Self {
        Self::new(AnalysisConfig::default().pitch_search_band)
    }
}

impl PitchEstimator for AutocorrelationPitchEstimator {
    fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> f32 {
        if stats::rms(frame) < SILENCE_RMS {
            return 0.0;
        }

        let min_lag = (sample_rate as f32 / self.band.max_hz) as usize;
        let max_lag = (sample_rate as f32 / self.band.min_hz) as usize;
        if min_lag == 0 || max_lag >= frame.len() {
            return 0.0;
        }

        let corr = stats::autocorrelation(frame, max_lag);

        let mut best_lag = 0;
        let mut best_value = 0.0f32;
        for (lag, &value) in corr.iter().enumerate().skip(min_lag) {
            if value > best_value {
                best_value = value;
                best_lag = lag;
            }
        }

        if best_lag == 0 || best_value < VOICING_THRESHOLD {
            return 0.0;
        }

        sample_rate as f32 / best_lag as f32
    }
}

/// McLeod pitch method adapter over the `pitch-detection` crate.
///
/// More robust than plain autocorrelation on real voices; the detector is
/// sized at construction and must be fed frames of exactly that length.
pub struct McLeodPitchEstimator {
    detector: McLeodDetector<f32>,
    frame_size: usize,
    power_threshold: f32,
    clarity_threshold: f32,
}

impl McLeodPitchEstimator {
    pub fn new(frame_size: usize) -> Self {
        Self {
            detector: McLeodDetector::new(frame_size, frame_size / 2),
            frame_size,
            power_threshold: 0.8,
            clarity_threshold: 0.5,
        }
    }
}

impl PitchEstimator for McLeodPitchEstimator {
    fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> f32 {
        if frame.len() != self.frame_size {
            return 0.0;
        }

        match self.detector.get_pitch(
            frame,
            sample_rate as usize,
            self.power_threshold,
            self.clarity_threshold,
        ) {
            Some(pitch) if pitch.frequency > 0.0 => pitch.frequency,
            _ => 0.0,
        }
    }
}

/// Pitch statistics over one take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchAnalysis {
    /// Voiced per-frame estimates in time order, strictly positive.
    pub values_hz: Vec<f32>,
    pub average_hz: f32,
    pub median_hz: f32,
    pub min_hz: f32,
    pub max_hz: f32,
    /// `1/(1+σ/mean)`: scale-invariant, 1.0 for a perfectly held pitch.
    pub stability: f32,
    pub range_hz: f32,
}

/// Slide pitch frames across the take, delegate each to the estimator, and
/// aggregate the voiced results.
pub fn analyze_pitch(
    buffer: &SampleBuffer,
    estimator: &mut dyn PitchEstimator,
    config: &AnalysisConfig,
) -> Result<PitchAnalysis> {
    let samples = buffer.samples();
    let sample_rate = buffer.sample_rate();
    let frame_size = config.pitch_frame_size;
    let hop_size = config.pitch_hop_size;

    let mut values = Vec::new();
    let mut total_frames = 0usize;
    let mut start = 0;
    while start + frame_size <= samples.len() {
        let estimate = estimator.estimate(&samples[start..start + frame_size], sample_rate);
        if estimate > 0.0 {
            values.push(estimate);
        }
        total_frames += 1;
        start += hop_size;
    }

    if values.is_empty() {
        return Err(AnalysisError::InsufficientSignal);
    }
    debug!(
        "pitch analysis: {}/{} frames voiced",
        values.len(),
        total_frames
    );

    let average = stats::mean(&values);
    let sigma = stats::std_dev(&values);

    let mut sorted = values.clone();
    let median = stats::median(&mut sorted);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    Ok(PitchAnalysis {
        values_hz: values,
        average_hz: average,
        median_hz: median,
        min_hz: min,
        max_hz: max,
        stability: 1.0 / (1.0 + sigma / average),
        range_hz: max - min,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_constant_estimator_statistics() {
        let samples = sine(440.0, 44100, 44100);
        let buffer = SampleBuffer::new(&samples, 44100).unwrap();
        let config = AnalysisConfig::default();

        let mut estimator = |_frame: &[f32], _rate: u32| 440.0f32;
        let analysis = analyze_pitch(&buffer, &mut estimator, &config).unwrap();

        assert!((analysis.average_hz - 440.0).abs() < 1e-3);
        assert!((analysis.median_hz - 440.0).abs() < 1e-3);
        assert!((analysis.stability - 1.0).abs() < 1e-6);
        assert!(analysis.range_hz.abs() < 1e-6);
    }

    #[test]
    fn test_unvoiced_take_fails() {
        let samples = vec![0.0f32; 44100];
        let buffer = SampleBuffer::new(&samples, 44100).unwrap();
        let config = AnalysisConfig::default();

        let mut estimator = |_frame: &[f32], _rate: u32| 0.0f32;
        let result = analyze_pitch(&buffer, &mut estimator, &config);
        assert!(matches!(result, Err(AnalysisError::InsufficientSignal)));
    }

    #[test]
    fn test_stability_formula() {
        // Alternating 100/110 Hz: mean 105, population sigma 5
        let samples = sine(105.0, 44100, 44100);
        let buffer = SampleBuffer::new(&samples, 44100).unwrap();
        let config = AnalysisConfig::default();

        let mut flip = false;
        let mut estimator = move |_frame: &[f32], _rate: u32| {
            flip = !flip;
            if flip {
                100.0f32
            } else {
                110.0f32
            }
        };
        let analysis = analyze_pitch(&buffer, &mut estimator, &config).unwrap();

        let expected = 1.0 / (1.0 + 5.0 / 105.0);
        assert!((analysis.stability - expected).abs() < 1e-3);
        assert!((analysis.range_hz - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_autocorrelation_estimator_on_sine() {
        let sample_rate = 44100;
        let samples = sine(220.0, sample_rate, 2048);
        let mut estimator = AutocorrelationPitchEstimator::default();

        let estimate = estimator.estimate(&samples, sample_rate);
        assert!(
            (estimate - 220.0).abs() < 5.0,
            "estimate {estimate} too far from 220"
        );
    }

    #[test]
    fn test_autocorrelation_estimator_on_silence() {
        let samples = vec![0.0f32; 2048];
        let mut estimator = AutocorrelationPitchEstimator::default();
        assert_eq!(estimator.estimate(&samples, 44100), 0.0);
    }

    #[test]
    fn test_mcleod_estimator_on_sine() {
        let sample_rate = 44100;
        let samples = sine(440.0, sample_rate, 2048);
        let mut estimator = McLeodPitchEstimator::new(2048);

        let estimate = estimator.estimate(&samples, sample_rate);
        assert!(
            (estimate - 440.0).abs() < 5.0,
            "estimate {estimate} too far from 440"
        );
    }

    #[test]
    fn test_mcleod_rejects_mismatched_frame() {
        let samples = sine(440.0, 44100, 1024);
        let mut estimator = McLeodPitchEstimator::new(2048);
        assert_eq!(estimator.estimate(&samples, 44100), 0.0);
    }
}
