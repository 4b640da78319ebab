// src/core/analyzer.rs
//
// High-level voice analysis API with builder pattern.

use crate::config::{builtin_profiles, AnalysisConfig, VoiceTypeProfile};
use crate::core::analysis::{
    analyze_formants, analyze_pitch, analyze_vibrato, AutocorrelationPitchEstimator,
    FormantAnalysis, PitchAnalysis, PitchEstimator, TimbreAnalysis, TimbreProfile,
    VibratoAnalysis,
};
use crate::core::buffer::SampleBuffer;
use crate::core::classifier::{self, VoiceClassificationResult};
use crate::core::health::{HealthAnalyzer, HealthHistory, VocalHealthAnalysis, VocalHealthSummary};
use crate::error::Result;

/// Builder for VoiceAnalyzer configuration
pub struct VoiceAnalyzerBuilder {
    config: AnalysisConfig,
    estimator: Option<Box<dyn PitchEstimator>>,
}

impl VoiceAnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            estimator: None,
        }
    }

    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default autocorrelation estimator.
    pub fn pitch_estimator(mut self, estimator: Box<dyn PitchEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    pub fn alternative_threshold(mut self, threshold: f32) -> Self {
        self.config.alternative_threshold = threshold;
        self
    }

    pub fn build(self) -> VoiceAnalyzer {
        let estimator = self.estimator.unwrap_or_else(|| {
            Box::new(AutocorrelationPitchEstimator::new(
                self.config.pitch_search_band,
            ))
        });
        VoiceAnalyzer {
            config: self.config,
            profiles: builtin_profiles(),
            estimator,
            health: HealthAnalyzer::new(),
        }
    }
}

impl Default for VoiceAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main voice analyzer tying the pipeline together.
///
/// Owns the configured pitch estimator and the health history; analysis
/// entry points take `&mut self` so history mutation and estimator scratch
/// state stay serialized by the borrow checker.
pub struct VoiceAnalyzer {
    config: AnalysisConfig,
    profiles: &'static [VoiceTypeProfile],
    estimator: Box<dyn PitchEstimator>,
    health: HealthAnalyzer,
}

impl VoiceAnalyzer {
    /// Create analyzer with default configuration
    pub fn new() -> Self {
        VoiceAnalyzerBuilder::new().build()
    }

    /// Create analyzer with custom configuration
    pub fn with_config(config: AnalysisConfig) -> Self {
        VoiceAnalyzerBuilder::new().config(config).build()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> VoiceAnalyzerBuilder {
        VoiceAnalyzerBuilder::new()
    }

    /// Classify the voice type of one take.
    pub fn classify_voice(
        &mut self,
        buffer: &SampleBuffer,
        timbre: &TimbreAnalysis,
    ) -> Result<VoiceClassificationResult> {
        let pitch = analyze_pitch(buffer, self.estimator.as_mut(), &self.config)?;
        let formants = analyze_formants(buffer, &self.config);
        let vibrato = analyze_vibrato(&pitch, buffer.sample_rate(), &self.config);
        let profile = TimbreProfile::from_analysis(timbre);

        Ok(classifier::classify(
            &pitch,
            &formants,
            &profile,
            &vibrato,
            buffer,
            self.profiles,
            &self.config,
        ))
    }

    /// Assess vocal health on one take and record it into the history.
    pub fn analyze_health(
        &mut self,
        buffer: &SampleBuffer,
        timbre: &TimbreAnalysis,
    ) -> Result<VocalHealthAnalysis> {
        Ok(self.health.analyze(buffer, timbre, &self.config))
    }

    /// Pitch statistics only.
    pub fn analyze_pitch(&mut self, buffer: &SampleBuffer) -> Result<PitchAnalysis> {
        analyze_pitch(buffer, self.estimator.as_mut(), &self.config)
    }

    /// Formant extraction only.
    pub fn analyze_formants(&self, buffer: &SampleBuffer) -> FormantAnalysis {
        analyze_formants(buffer, &self.config)
    }

    /// Vibrato measurement on the voiced pitch contour of one take.
    pub fn analyze_vibrato(&mut self, buffer: &SampleBuffer) -> Result<VibratoAnalysis> {
        let pitch = analyze_pitch(buffer, self.estimator.as_mut(), &self.config)?;
        Ok(analyze_vibrato(&pitch, buffer.sample_rate(), &self.config))
    }

    /// Latest health sample plus current trends, if any call has run.
    pub fn health_summary(&self) -> Option<VocalHealthSummary> {
        self.health.summary()
    }

    pub fn history(&self) -> &HealthHistory {
        self.health.history()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

impl Default for VoiceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
