//! Vocal-health assessment engine
//!
//! Turns a timbre analysis plus the raw buffer into eight indicators, an
//! overall condition, concerns, insights, recommendations, and a risk
//! assessment, recording every call into the bounded history.

mod history;
mod indicators;

pub use history::{
    HealthHistory, HealthRisk, HealthRiskAssessment, HealthTrends, RiskKind, RiskLevel,
    TrendDirection, VocalHealthSample, RETENTION_DAYS,
};
pub use indicators::{compute_indicators, VocalHealthIndicators};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::core::analysis::TimbreAnalysis;
use crate::core::buffer::SampleBuffer;
use crate::core::dsp::{stats, FftProcessor};

/// Weights of the overall-condition blend; the divisor renormalizes the
/// best reachable raw value back to 1.0.
const CONDITION_NORMALIZER: f32 = 1.3;

/// Transform length for the spectral-centroid measurement.
const CENTROID_FFT_SIZE: usize = 2048;
/// Frame geometry for the dynamic-range measurement.
const LEVEL_FRAME_SIZE: usize = 1024;
const LEVEL_HOP_SIZE: usize = 512;

/// Discrete condition bands mapped from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionLevel {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ConditionLevel {
    pub fn from_score(score: f32) -> Self {
        match score {
            s if s >= 0.8 => Self::Excellent,
            s if s >= 0.6 => Self::Good,
            s if s >= 0.4 => Self::Fair,
            s if s >= 0.2 => Self::Poor,
            _ => Self::Critical,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Critical => "critical",
        }
    }
}

/// Which indicator raised a concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcernKind {
    Strain,
    Fatigue,
    Hoarseness,
    Breathiness,
    Tremor,
    VoiceBreaks,
}

/// How far past its threshold an indicator sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Minimal,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn from_score(score: f32) -> Self {
        match score {
            s if s >= 0.8 => Self::Severe,
            s if s >= 0.6 => Self::Moderate,
            s if s >= 0.4 => Self::Mild,
            _ => Self::Minimal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryConcern {
    pub kind: ConcernKind,
    pub severity: Severity,
    pub description: String,
}

/// Overall condition of the voice on one take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalCondition {
    pub overall_score: f32,
    pub level: ConditionLevel,
    pub concerns: Vec<PrimaryConcern>,
}

impl VocalCondition {
    /// Blend the indicators into the overall score, map the level, and run
    /// the per-indicator concern thresholds.
    pub fn from_indicators(ind: &VocalHealthIndicators) -> Self {
        let raw = 1.0
            - 0.25 * ind.strain
            - 0.20 * ind.fatigue
            - 0.20 * ind.hoarseness
            - 0.15 * ind.breathiness
            - 0.10 * ind.tremor
            - 0.10 * ind.voice_breaks
            + 0.15 * ind.pitch_stability
            + 0.15 * ind.resonance_quality;
        let overall_score = (raw / CONDITION_NORMALIZER).clamp(0.0, 1.0);

        // Trigger thresholds are strict; the severity bucket is inclusive
        // so a 0.8 strain reads as severe
        let triggers: [(ConcernKind, f32, f32, &str); 6] = [
            (
                ConcernKind::Strain,
                ind.strain,
                0.7,
                "Vocal strain is elevated; the voice is working harder than it should.",
            ),
            (
                ConcernKind::Fatigue,
                ind.fatigue,
                0.6,
                "Signs of vocal fatigue; tone and flexibility are reduced.",
            ),
            (
                ConcernKind::Hoarseness,
                ind.hoarseness,
                0.5,
                "Hoarseness detected; the tone carries roughness and inharmonicity.",
            ),
            (
                ConcernKind::Breathiness,
                ind.breathiness,
                0.4,
                "Breathiness detected; air is escaping unphonated.",
            ),
            (
                ConcernKind::Tremor,
                ind.tremor,
                0.3,
                "Slow amplitude tremor detected in the 4-12 Hz band.",
            ),
            (
                ConcernKind::VoiceBreaks,
                ind.voice_breaks,
                0.2,
                "Voice breaks detected; phonation is cutting out mid-tone.",
            ),
        ];

        let concerns = triggers
            .into_iter()
            .filter(|(_, value, threshold, _)| value > threshold)
            .map(|(kind, value, _, description)| PrimaryConcern {
                kind,
                severity: Severity::from_score(value),
                description: description.to_string(),
            })
            .collect();

        Self {
            overall_score,
            level: ConditionLevel::from_score(overall_score),
            concerns,
        }
    }
}

/// Take-level signal character stored with every health sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioCharacteristics {
    pub average_amplitude: f32,
    pub dynamic_range_db: f32,
    pub spectral_centroid_hz: f32,
    pub zero_crossing_rate: f32,
}

impl AudioCharacteristics {
    pub fn from_buffer(buffer: &SampleBuffer) -> Self {
        let samples = buffer.samples();
        let average_amplitude =
            samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32;

        let mut frame_db = Vec::new();
        let mut start = 0;
        while start + LEVEL_FRAME_SIZE <= samples.len() {
            frame_db.push(stats::amplitude_to_db(stats::rms(
                &samples[start..start + LEVEL_FRAME_SIZE],
            )));
            start += LEVEL_HOP_SIZE;
        }
        frame_db.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let dynamic_range_db = if frame_db.len() >= 2 {
            stats::percentile(&frame_db, 0.95) - stats::percentile(&frame_db, 0.05)
        } else {
            0.0
        };

        let mut fft = FftProcessor::new(CENTROID_FFT_SIZE);
        let spectrum = fft.average_spectrum(samples, LEVEL_HOP_SIZE);

        Self {
            average_amplitude,
            dynamic_range_db,
            spectral_centroid_hz: stats::spectral_centroid(&spectrum, buffer.sample_rate()),
            zero_crossing_rate: stats::zero_crossing_rate(samples),
        }
    }
}

/// Everything one health call produces for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalHealthAnalysis {
    pub timestamp: DateTime<Utc>,
    pub indicators: VocalHealthIndicators,
    pub condition: VocalCondition,
    pub trends: HealthTrends,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk: HealthRiskAssessment,
    pub audio: AudioCharacteristics,
}

/// Latest sample plus current trends, for dashboard-style consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalHealthSummary {
    pub latest: VocalHealthSample,
    pub trends: HealthTrends,
}

/// The health engine: stateless indicator math plus the owned history.
#[derive(Debug, Default)]
pub struct HealthAnalyzer {
    history: HealthHistory,
}

impl HealthAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one full health assessment and record it into the history.
    pub fn analyze(
        &mut self,
        buffer: &SampleBuffer,
        timbre: &TimbreAnalysis,
        config: &AnalysisConfig,
    ) -> VocalHealthAnalysis {
        let indicators = compute_indicators(timbre, buffer, config);
        let condition = VocalCondition::from_indicators(&indicators);
        let audio = AudioCharacteristics::from_buffer(buffer);
        let timestamp = Utc::now();

        self.history.record(VocalHealthSample {
            timestamp,
            indicators,
            overall_health: condition.overall_score,
            audio,
        });

        let trends = self.history.trends();
        let risk = self.history.assess_risk(&trends);
        let insights = build_insights(&condition, &trends);
        let recommendations = build_recommendations(&condition, &risk);

        debug!(
            "health analysis: score {:.2} ({}), {} concerns, risk {:?}",
            condition.overall_score,
            condition.level.name(),
            condition.concerns.len(),
            risk.level
        );

        VocalHealthAnalysis {
            timestamp,
            indicators,
            condition,
            trends,
            insights,
            recommendations,
            risk,
            audio,
        }
    }

    pub fn summary(&self) -> Option<VocalHealthSummary> {
        self.history.latest().map(|latest| VocalHealthSummary {
            latest: latest.clone(),
            trends: self.history.trends(),
        })
    }

    pub fn history(&self) -> &HealthHistory {
        &self.history
    }
}

/// Rule table keyed by condition level and overall trend.
fn build_insights(condition: &VocalCondition, trends: &HealthTrends) -> Vec<String> {
    let mut out = Vec::new();

    out.push(
        match condition.level {
            ConditionLevel::Excellent => "The voice is in excellent condition.",
            ConditionLevel::Good => "The voice is in good overall condition.",
            ConditionLevel::Fair => "The voice shows moderate wear; attentive practice advised.",
            ConditionLevel::Poor => "The voice is in poor condition; reduce vocal load.",
            ConditionLevel::Critical => {
                "The voice is in critical condition; rest and professional evaluation advised."
            }
        }
        .to_string(),
    );

    match trends.overall {
        TrendDirection::Improving => {
            out.push("Overall vocal health has been improving recently.".to_string())
        }
        TrendDirection::Declining => {
            out.push("Overall vocal health has been declining recently.".to_string())
        }
        TrendDirection::Stable => {}
    }
    if trends.strain == TrendDirection::Declining {
        out.push("Strain has been building across recent sessions.".to_string());
    }
    if trends.hoarseness == TrendDirection::Declining {
        out.push("Hoarseness has been building across recent sessions.".to_string());
    }

    out
}

/// Rule table keyed by individual concerns and the risk level.
fn build_recommendations(condition: &VocalCondition, risk: &HealthRiskAssessment) -> Vec<String> {
    let mut out = Vec::new();

    for concern in &condition.concerns {
        let text = match concern.kind {
            ConcernKind::Strain => {
                "Reduce vocal load and favor low-impact warm-ups such as lip trills."
            }
            ConcernKind::Fatigue => "Schedule vocal rest and shorten practice blocks.",
            ConcernKind::Hoarseness => {
                "Hydrate well and avoid whispering; persistent hoarseness merits a check-up."
            }
            ConcernKind::Breathiness => {
                "Work on breath support and clean onsets to reduce air leakage."
            }
            ConcernKind::Tremor => "Practice sustained tones at low volume to steady the airflow.",
            ConcernKind::VoiceBreaks => {
                "Smooth register transitions with gentle sirens through the break area."
            }
        };
        out.push(text.to_string());
    }

    if risk.level >= RiskLevel::Medium {
        out.push(
            "Risk indicators are elevated; consider consulting a laryngologist.".to_string(),
        );
    }
    if out.is_empty() {
        out.push("Maintain the current routine; no corrective action needed.".to_string());
    }

    out
}
