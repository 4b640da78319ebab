//! Bounded health-sample history, trend regression, and risk rules

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::indicators::VocalHealthIndicators;
use super::AudioCharacteristics;
use crate::core::dsp::stats;

/// Samples older than this are evicted on every insert.
pub const RETENTION_DAYS: i64 = 30;
/// Trend regression needs at least this many samples.
const TREND_MIN_SAMPLES: usize = 5;
/// At most this many recent samples feed the regression.
const TREND_WINDOW: usize = 10;
/// Regression slopes inside ±this band read as stable.
const SLOPE_THRESHOLD: f32 = 0.02;

/// Probability assigned to the nodule/polyp rule.
const NODULE_RISK_PROBABILITY: f32 = 0.3;
/// Probability assigned to the inflammation rule.
const INFLAMMATION_RISK_PROBABILITY: f32 = 0.4;

/// One historical health snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalHealthSample {
    pub timestamp: DateTime<Utc>,
    pub indicators: VocalHealthIndicators,
    pub overall_health: f32,
    pub audio: AudioCharacteristics,
}

/// Direction a tracked health series is moving, judged in health terms:
/// `Improving` always means the voice is getting better, regardless of
/// whether the underlying series rises or falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

/// Trend directions over the recent history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthTrends {
    pub overall: TrendDirection,
    pub strain: TrendDirection,
    pub fatigue: TrendDirection,
    pub hoarseness: TrendDirection,
    pub breathiness: TrendDirection,
    /// Days spanned by the samples the trends were regressed over.
    pub period_days: f32,
}

impl HealthTrends {
    /// All-stable trends covering no period; reported while the history is
    /// too thin to regress.
    pub fn stable() -> Self {
        Self {
            overall: TrendDirection::Stable,
            strain: TrendDirection::Stable,
            fatigue: TrendDirection::Stable,
            hoarseness: TrendDirection::Stable,
            breathiness: TrendDirection::Stable,
            period_days: 0.0,
        }
    }
}

/// Kinds of structural/functional risk the rules can flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskKind {
    NodulesOrPolyps,
    Inflammation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRisk {
    pub kind: RiskKind,
    pub probability: f32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRiskAssessment {
    pub level: RiskLevel,
    pub risks: Vec<HealthRisk>,
}

/// Time-ordered health history, most recent first, pruned to the retention
/// window on every insert. The single mutable entity in the crate; owned by
/// the health engine and mutated only through [`record`].
///
/// [`record`]: HealthHistory::record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthHistory {
    samples: VecDeque<VocalHealthSample>,
}

impl HealthHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front, then evict everything older than the retention
    /// window measured from the newly inserted sample.
    pub fn record(&mut self, sample: VocalHealthSample) {
        let cutoff = sample.timestamp - Duration::days(RETENTION_DAYS);
        self.samples.push_front(sample);

        let before = self.samples.len();
        self.samples.retain(|s| s.timestamp >= cutoff);
        let evicted = before - self.samples.len();
        if evicted > 0 {
            debug!("health history: evicted {evicted} expired samples");
        }
    }

    pub fn latest(&self) -> Option<&VocalHealthSample> {
        self.samples.front()
    }

    /// Most recent first.
    pub fn samples(&self) -> impl Iterator<Item = &VocalHealthSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Regress the five tracked series over the most recent window.
    pub fn trends(&self) -> HealthTrends {
        if self.samples.len() < TREND_MIN_SAMPLES {
            return HealthTrends::stable();
        }

        // Oldest-to-newest inside the window, so a positive slope means the
        // series is rising over time
        let window: Vec<&VocalHealthSample> =
            self.samples.iter().take(TREND_WINDOW).rev().collect();

        let direction = |values: Vec<f32>, higher_is_better: bool| {
            let points: Vec<(f32, f32)> = values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i as f32, v))
                .collect();
            let slope = stats::linear_slope(&points);

            if slope.abs() <= SLOPE_THRESHOLD {
                TrendDirection::Stable
            } else if (slope > 0.0) == higher_is_better {
                TrendDirection::Improving
            } else {
                TrendDirection::Declining
            }
        };

        let series = |f: fn(&VocalHealthSample) -> f32| -> Vec<f32> {
            window.iter().map(|s| f(*s)).collect()
        };

        let period = window[window.len() - 1].timestamp - window[0].timestamp;
        let period_days = period.num_seconds() as f32 / 86_400.0;

        HealthTrends {
            overall: direction(series(|s| s.overall_health), true),
            strain: direction(series(|s| s.indicators.strain), false),
            fatigue: direction(series(|s| s.indicators.fatigue), false),
            hoarseness: direction(series(|s| s.indicators.hoarseness), false),
            breathiness: direction(series(|s| s.indicators.breathiness), false),
            period_days,
        }
    }

    /// Apply the risk rules to the latest indicators and current trends.
    pub fn assess_risk(&self, trends: &HealthTrends) -> HealthRiskAssessment {
        let mut risks = Vec::new();

        if let Some(latest) = self.latest() {
            let ind = &latest.indicators;

            if ind.strain > 0.7 && ind.hoarseness > 0.6 {
                risks.push(HealthRisk {
                    kind: RiskKind::NodulesOrPolyps,
                    probability: NODULE_RISK_PROBABILITY,
                    description: "Sustained high strain combined with hoarseness is consistent \
                                  with developing nodules or polyps."
                        .to_string(),
                });
            }

            if ind.strain > 0.6 && trends.strain == TrendDirection::Declining {
                risks.push(HealthRisk {
                    kind: RiskKind::Inflammation,
                    probability: INFLAMMATION_RISK_PROBABILITY,
                    description: "Elevated and worsening strain suggests laryngeal inflammation."
                        .to_string(),
                });
            }
        }

        let max_probability = risks
            .iter()
            .map(|r| r.probability)
            .fold(0.0f32, f32::max);
        let level = if max_probability >= 0.5 {
            RiskLevel::High
        } else if max_probability >= 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        HealthRiskAssessment { level, risks }
    }
}
