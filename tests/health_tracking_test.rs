//! Integration tests for health assessment and history tracking

use anyhow::Result;
use chrono::{Duration, Utc};
use vocalyzer::{
    AudioCharacteristics, ConcernKind, ConditionLevel, HealthHistory, HealthTrends, RiskKind,
    RiskLevel, SampleBuffer, Severity, TimbreAnalysis, TrendDirection, VocalCondition,
    VocalHealthIndicators, VocalHealthSample, VoiceAnalyzer,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sine(freq: f32, secs: f32) -> Vec<f32> {
    let len = (secs * 44100.0) as usize;
    (0..len)
        .map(|i| 0.5 * (2.0 * std::f32::consts::PI * freq * i as f32 / 44100.0).sin())
        .collect()
}

fn healthy_timbre() -> TimbreAnalysis {
    TimbreAnalysis {
        brightness: 0.6,
        warmth: 0.6,
        resonance: 0.8,
        roughness: 0.1,
        inharmonicity: 0.1,
        spectral_balance: 0.6,
        pitch_stability: 0.95,
    }
}

fn indicators(overrides: impl Fn(&mut VocalHealthIndicators)) -> VocalHealthIndicators {
    let mut ind = VocalHealthIndicators {
        strain: 0.2,
        fatigue: 0.2,
        hoarseness: 0.2,
        breathiness: 0.2,
        tremor: 0.0,
        voice_breaks: 0.0,
        pitch_stability: 0.9,
        resonance_quality: 0.8,
    };
    overrides(&mut ind);
    ind
}

fn sample_at(ago_days: i64, overall: f32, ind: VocalHealthIndicators) -> VocalHealthSample {
    VocalHealthSample {
        timestamp: Utc::now() - Duration::days(ago_days),
        indicators: ind,
        overall_health: overall,
        audio: AudioCharacteristics::default(),
    }
}

#[test]
fn health_scenario_score_level_and_concerns() {
    let ind = indicators(|i| {
        i.strain = 0.8;
        i.hoarseness = 0.7;
        i.breathiness = 0.1;
    });
    let condition = VocalCondition::from_indicators(&ind);

    assert!(
        (condition.overall_score - 0.86 / 1.3).abs() < 1e-4,
        "score {}",
        condition.overall_score
    );
    assert_eq!(condition.level, ConditionLevel::Good);

    let strain = condition
        .concerns
        .iter()
        .find(|c| c.kind == ConcernKind::Strain)
        .expect("strain concern");
    assert_eq!(strain.severity, Severity::Severe);
    let hoarseness = condition
        .concerns
        .iter()
        .find(|c| c.kind == ConcernKind::Hoarseness)
        .expect("hoarseness concern");
    assert_eq!(hoarseness.severity, Severity::Moderate);
}

#[test]
fn full_health_analysis_on_clean_tone() -> Result<()> {
    init_logging();

    let samples = sine(220.0, 3.0);
    let buffer = SampleBuffer::new(&samples, 44100)?;
    let mut analyzer = VoiceAnalyzer::new();

    let analysis = analyzer.analyze_health(&buffer, &healthy_timbre())?;

    assert!(analysis.indicators.in_bounds());
    assert!((0.0..=1.0).contains(&analysis.condition.overall_score));
    // A clean periodic tone with a healthy timbre scores at least fair
    assert!(analysis.condition.level >= ConditionLevel::Fair);
    assert!(!analysis.insights.is_empty());
    assert!(!analysis.recommendations.is_empty());
    assert!(analysis.audio.average_amplitude > 0.2);
    assert!(analysis.audio.spectral_centroid_hz > 0.0);
    Ok(())
}

#[test]
fn history_grows_per_call_and_summary_tracks_latest() -> Result<()> {
    init_logging();

    let samples = sine(220.0, 1.0);
    let buffer = SampleBuffer::new(&samples, 44100)?;
    let mut analyzer = VoiceAnalyzer::new();

    assert!(analyzer.health_summary().is_none());
    for expected_len in 1..=3 {
        let analysis = analyzer.analyze_health(&buffer, &healthy_timbre())?;
        assert_eq!(analyzer.history().len(), expected_len);

        let summary = analyzer.health_summary().expect("summary after a call");
        assert_eq!(summary.latest.timestamp, analysis.timestamp);
        assert_eq!(
            summary.latest.overall_health,
            analysis.condition.overall_score
        );
    }
    Ok(())
}

#[test]
fn eviction_never_retains_expired_samples() {
    let mut history = HealthHistory::new();
    for ago in [60, 45, 31, 29, 15, 7, 0] {
        history.record(sample_at(ago, 0.7, indicators(|_| {})));

        // Retention is measured from the most recent sample
        let cutoff = history.latest().unwrap().timestamp - Duration::days(30);
        assert!(
            history.samples().all(|s| s.timestamp >= cutoff),
            "expired sample survived an insert"
        );
    }
    assert_eq!(history.len(), 4);
}

#[test]
fn trend_monotonicity() {
    let mut improving = HealthHistory::new();
    let mut declining = HealthHistory::new();
    let mut constant = HealthHistory::new();

    for i in 0..10i64 {
        let rising = 0.3 + 0.05 * i as f32;
        let falling = 0.8 - 0.05 * i as f32;
        improving.record(sample_at(10 - i, rising, indicators(|_| {})));
        declining.record(sample_at(10 - i, falling, indicators(|_| {})));
        constant.record(sample_at(10 - i, 0.6, indicators(|_| {})));
    }

    assert_eq!(improving.trends().overall, TrendDirection::Improving);
    assert_eq!(declining.trends().overall, TrendDirection::Declining);
    assert_eq!(constant.trends().overall, TrendDirection::Stable);
    assert!(improving.trends().period_days > 0.0);
}

#[test]
fn too_few_samples_report_stable() {
    let mut history = HealthHistory::new();
    for ago in [3, 2, 1, 0] {
        history.record(sample_at(ago, 0.2 + ago as f32 * 0.2, indicators(|_| {})));
    }
    assert_eq!(history.trends(), HealthTrends::stable());
}

#[test]
fn nodule_and_inflammation_risk_rules() {
    // Nodule rule: high strain with high hoarseness on the latest sample
    let mut history = HealthHistory::new();
    history.record(sample_at(
        0,
        0.4,
        indicators(|i| {
            i.strain = 0.75;
            i.hoarseness = 0.65;
        }),
    ));
    let assessment = history.assess_risk(&HealthTrends::stable());
    assert_eq!(assessment.level, RiskLevel::Medium);
    assert!(assessment
        .risks
        .iter()
        .any(|r| r.kind == RiskKind::NodulesOrPolyps));

    // Inflammation rule: elevated strain while the strain trend worsens
    let mut worsening = HealthHistory::new();
    for i in 0..10i64 {
        worsening.record(sample_at(
            10 - i,
            0.6,
            indicators(|ind| ind.strain = 0.25 + 0.05 * i as f32),
        ));
    }
    let trends = worsening.trends();
    assert_eq!(trends.strain, TrendDirection::Declining);
    let assessment = worsening.assess_risk(&trends);
    assert!(assessment
        .risks
        .iter()
        .any(|r| r.kind == RiskKind::Inflammation));

    // Healthy history flags nothing
    let mut calm = HealthHistory::new();
    calm.record(sample_at(0, 0.9, indicators(|_| {})));
    let calm_assessment = calm.assess_risk(&HealthTrends::stable());
    assert_eq!(calm_assessment.level, RiskLevel::Low);
    assert!(calm_assessment.risks.is_empty());
}

#[test]
fn indicators_survive_serde_round_trip() -> Result<()> {
    let ind = indicators(|i| i.tremor = 0.35);
    let json = serde_json::to_string(&ind)?;
    let back: VocalHealthIndicators = serde_json::from_str(&json)?;
    assert_eq!(ind, back);
    Ok(())
}
