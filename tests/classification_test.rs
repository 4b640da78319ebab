//! Integration tests for the classification pipeline

use anyhow::Result;
use vocalyzer::core::classifier::rank_profiles;
use vocalyzer::{
    builtin_profiles, FormantAnalysis, FrequencyRange, SampleBuffer, TimbreAnalysis,
    TimbreProfile, VoiceAnalyzer, VoiceType,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sine(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
    let len = (secs * sample_rate as f32) as usize;
    (0..len)
        .map(|i| 0.5 * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Deterministic pseudo-noise without an RNG dependency.
fn lcg_noise(len: usize) -> Vec<f32> {
    let mut state = 0x1234_5678u32;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 8) as f32 / (1 << 24) as f32 * 2.0 - 1.0
        })
        .collect()
}

fn neutral_timbre() -> TimbreAnalysis {
    TimbreAnalysis {
        brightness: 0.5,
        warmth: 0.6,
        resonance: 0.7,
        roughness: 0.2,
        inharmonicity: 0.15,
        spectral_balance: 0.6,
        pitch_stability: 0.9,
    }
}

#[test]
fn sine_440_pitch_statistics() -> Result<()> {
    init_logging();

    // 12 s of 440 Hz at 44.1 kHz, with a stub estimator that always reports
    // 440 for a voiced frame
    let samples = sine(440.0, 44100, 12.0);
    let buffer = SampleBuffer::new(&samples, 44100)?;

    let mut analyzer = VoiceAnalyzer::builder()
        .pitch_estimator(Box::new(|_frame: &[f32], _rate: u32| 440.0f32))
        .build();
    let pitch = analyzer.analyze_pitch(&buffer)?;

    assert!((pitch.average_hz - 440.0).abs() < 1e-3);
    assert!((pitch.median_hz - 440.0).abs() < 1e-3);
    assert!((pitch.stability - 1.0).abs() < 1e-6);
    assert!(pitch.range_hz.abs() < 1e-6);
    Ok(())
}

#[test]
fn bass_scenario_ranks_bass_first() {
    init_logging();

    let timbre = TimbreProfile {
        brightness: 0.3,
        warmth: 0.9,
        resonance: 0.9,
        clarity: 0.7,
    };
    let formants = FormantAnalysis {
        f1_hz: 350.0,
        f2_hz: 700.0,
        f3_hz: 2400.0,
        f1_range: FrequencyRange::new(340.0, 360.0),
        f2_range: FrequencyRange::new(690.0, 710.0),
        singers_formant_prominence: 0.1,
    };
    let observed = FrequencyRange::new(90.0, 110.0);

    let ranked = rank_profiles(150.0, &observed, &timbre, &formants, builtin_profiles());
    assert_eq!(ranked[0].voice_type, VoiceType::Bass);
    assert!(ranked.iter().all(|s| (0.0..=1.0).contains(&s.confidence)));
    // Descending order is preserved
    assert!(ranked
        .windows(2)
        .all(|pair| pair[0].confidence >= pair[1].confidence));
}

#[test]
fn classification_idempotence() -> Result<()> {
    init_logging();

    let samples = sine(150.0, 44100, 3.0);
    let buffer = SampleBuffer::new(&samples, 44100)?;
    let timbre = neutral_timbre();

    let mut analyzer = VoiceAnalyzer::new();
    let first = analyzer.classify_voice(&buffer, &timbre)?;
    let second = analyzer.classify_voice(&buffer, &timbre)?;

    // Byte-identical output: no randomness, no time dependence
    assert_eq!(
        serde_json::to_string(&first)?,
        serde_json::to_string(&second)?
    );
    Ok(())
}

#[test]
fn overlap_symmetry() {
    let pairs = [
        (FrequencyRange::new(90.0, 110.0), FrequencyRange::new(82.41, 329.63)),
        (FrequencyRange::new(200.0, 400.0), FrequencyRange::new(300.0, 500.0)),
        (FrequencyRange::new(100.0, 200.0), FrequencyRange::new(300.0, 400.0)),
    ];
    for (a, b) in pairs {
        assert!((a.overlap_length(&b) - b.overlap_length(&a)).abs() < 1e-6);
    }
}

#[test]
fn scores_bounded_on_noise() -> Result<()> {
    init_logging();

    let samples = lcg_noise(44100 * 2);
    let buffer = SampleBuffer::new(&samples, 44100)?;

    // A wandering stub keeps the pitch pass voiced on noise input
    let mut step = 0u32;
    let estimator = move |_frame: &[f32], _rate: u32| {
        step = step.wrapping_add(1);
        100.0 + (step % 50) as f32 * 4.0
    };

    let mut analyzer = VoiceAnalyzer::builder()
        .pitch_estimator(Box::new(estimator))
        .build();
    let result = analyzer.classify_voice(&buffer, &neutral_timbre())?;

    assert!((0.0..=1.0).contains(&result.confidence));
    for alt in &result.alternatives {
        assert!((0.0..=1.0).contains(&alt.confidence));
        assert!(alt.confidence > 0.3, "alternatives are thresholded");
        assert!(alt.confidence <= result.confidence);
    }
    assert!((0.0..=1.0).contains(&result.timbre.brightness));
    assert!(result.vocal_range.lowest_hz <= result.vocal_range.highest_hz);
    Ok(())
}

#[test]
fn full_pipeline_estimates_fundamental() -> Result<()> {
    init_logging();

    // Real autocorrelation estimator on a clean 196 Hz tone (G3)
    let samples = sine(196.0, 44100, 3.0);
    let buffer = SampleBuffer::new(&samples, 44100)?;

    let mut analyzer = VoiceAnalyzer::new();
    let result = analyzer.classify_voice(&buffer, &neutral_timbre())?;

    assert!(
        (result.average_fundamental_hz - 196.0).abs() < 8.0,
        "fundamental {}",
        result.average_fundamental_hz
    );
    assert!(!result.recommendations.is_empty());
    assert!((result.metadata.duration_secs - 3.0).abs() < 0.01);
    assert_eq!(result.metadata.sample_rate, 44100);
    Ok(())
}

#[test]
fn short_buffer_rejected_before_analysis() {
    let samples = vec![0.1f32; 512]; // ~12 ms at 44.1 kHz
    assert!(SampleBuffer::new(&samples, 44100).is_err());
    assert!(SampleBuffer::new(&[], 44100).is_err());
}

#[test]
fn unvoiced_take_reports_insufficient_signal() {
    let samples = vec![0.0f32; 44100];
    let buffer = SampleBuffer::new(&samples, 44100).unwrap();

    let mut analyzer = VoiceAnalyzer::new();
    let result = analyzer.classify_voice(&buffer, &neutral_timbre());
    assert!(matches!(
        result,
        Err(vocalyzer::AnalysisError::InsufficientSignal)
    ));
}
