//! Configuration for the analysis pipeline

mod profiles;

pub use profiles::{
    builtin_profiles, FrequencyRange, TimbreTargets, VoiceType, VoiceTypeProfile,
};

use serde::{Deserialize, Serialize};

/// Tunable parameters for the analysis pipeline.
///
/// Defaults match the reference behavior; most callers never change them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Frame length for pitch estimation.
    pub pitch_frame_size: usize,
    /// Hop between consecutive pitch frames.
    pub pitch_hop_size: usize,
    /// Frame length for formant extraction.
    pub formant_frame_size: usize,
    /// Hop between consecutive formant frames.
    pub formant_hop_size: usize,
    /// Band a spectral peak must fall into to count as a formant.
    pub formant_band: FrequencyRange,
    /// Classification alternatives below this score are dropped.
    pub alternative_threshold: f32,
    /// Search band for the built-in autocorrelation pitch estimator.
    pub pitch_search_band: FrequencyRange,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pitch_frame_size: 2048,
            pitch_hop_size: 512,
            formant_frame_size: 4096,
            formant_hop_size: 2048,
            formant_band: FrequencyRange::new(200.0, 4000.0),
            alternative_threshold: 0.3,
            pitch_search_band: FrequencyRange::new(80.0, 800.0),
        }
    }
}
