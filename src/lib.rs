//! Vocalyzer - Voice analysis and classification library
//!
//! Turns a raw audio sample buffer into a pitch/formant profile, a
//! voice-type classification with confidence and alternatives, and a
//! multi-indicator vocal-health assessment with historical trend tracking
//! and risk scoring.
//!
//! ## Features
//!
//! - **Pitch statistics**: frame-wise estimates aggregated into mean,
//!   median, stability, and range, with pluggable estimators
//!   (autocorrelation, McLeod, or any closure)
//! - **Formant extraction**: F1-F3 from band-filtered spectral peaks,
//!   plus singer's-formant prominence
//! - **Voice-type classification**: weighted pitch/range/timbre/formant
//!   scoring against six reference profiles, with ranked alternatives
//! - **Vocal-health indicators**: eight deterministic indicators, an
//!   overall condition with concerns, insights, and recommendations
//! - **Health history**: 30-day bounded sample history with trend
//!   regression and rule-based risk assessment
//! - **Vibrato analysis**: rate, extent, and regularity of periodic pitch
//!   modulation
//!
//! ## Module Structure
//!
//! - `core` - Analysis algorithms, classifier, health engine, DSP utilities
//! - `config` - Analysis parameters and the voice-type profile catalogue
//! - `error` - Error types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vocalyzer::{SampleBuffer, TimbreAnalysis, VoiceAnalyzer};
//!
//! let buffer = SampleBuffer::new(&samples, 44_100)?;
//! let mut analyzer = VoiceAnalyzer::new();
//!
//! let classification = analyzer.classify_voice(&buffer, &timbre)?;
//! println!("{} ({:.0}%)", classification.primary_type,
//!          classification.confidence * 100.0);
//!
//! let health = analyzer.analyze_health(&buffer, &timbre)?;
//! println!("condition: {}", health.condition.level.name());
//! ```
//!
//! ## Voice Type Catalogue
//!
//! | Type          | Fundamental (Hz) | Optimal (Hz)   |
//! |---------------|------------------|----------------|
//! | Soprano       | 261.63-1046.50   | 440.00-880.00  |
//! | Mezzo-Soprano | 220.00-880.00    | 329.63-659.26  |
//! | Alto          | 174.61-698.46    | 261.63-523.25  |
//! | Tenor         | 130.81-523.25    | 196.00-392.00  |
//! | Baritone      | 98.00-392.00     | 146.83-293.66  |
//! | Bass          | 82.41-329.63     | 110.00-246.94  |
//!
//! The catalogue is static configuration data, initialized once and shared
//! read-only by every analyzer instance.

// Core analysis functionality
pub mod core;

// Configuration and reference profiles
pub mod config;

// Error types
pub mod error;

// Re-export commonly used types at crate root for convenience
pub use config::{
    builtin_profiles, AnalysisConfig, FrequencyRange, TimbreTargets, VoiceType, VoiceTypeProfile,
};
pub use crate::core::analysis::{
    analyze_formants, analyze_pitch, analyze_vibrato, AutocorrelationPitchEstimator,
    FormantAnalysis, McLeodPitchEstimator, PitchAnalysis, PitchEstimator, TimbreAnalysis,
    TimbreProfile, VibratoAnalysis, VibratoKind,
};
pub use crate::core::classifier::{
    AnalysisMetadata, ScoredType, VocalRange, VoiceClassificationResult,
};
pub use crate::core::health::{
    AudioCharacteristics, ConcernKind, ConditionLevel, HealthHistory, HealthRisk,
    HealthRiskAssessment, HealthTrends, PrimaryConcern, RiskKind, RiskLevel, Severity,
    TrendDirection, VocalCondition, VocalHealthAnalysis, VocalHealthIndicators,
    VocalHealthSample, VocalHealthSummary,
};
pub use crate::core::note::Note;
pub use crate::core::{SampleBuffer, VoiceAnalyzer, VoiceAnalyzerBuilder};
pub use error::{AnalysisError, Result};
