//! Voice-type classification against the reference profile catalogue

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, FrequencyRange, VoiceType, VoiceTypeProfile};
use crate::core::analysis::{
    FormantAnalysis, PitchAnalysis, TimbreProfile, VibratoAnalysis, VibratoKind,
};
use crate::core::buffer::SampleBuffer;
use crate::core::dsp::stats;
use crate::core::note::Note;

/// Sub-score weights: pitch placement, range overlap, timbre match,
/// formant match.
const WEIGHT_PITCH: f32 = 0.30;
const WEIGHT_RANGE: f32 = 0.25;
const WEIGHT_TIMBRE: f32 = 0.25;
const WEIGHT_FORMANT: f32 = 0.20;

/// Frame geometry for the dynamic-range measurement.
const METADATA_FRAME_SIZE: usize = 1024;
const METADATA_HOP_SIZE: usize = 512;

/// Observed singing range of one take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalRange {
    pub lowest_hz: f32,
    pub highest_hz: f32,
    /// Interquartile band of the voiced pitch values: where the singer
    /// actually sat, robust against scoops and cracks at the extremes.
    pub comfortable: FrequencyRange,
    pub span_semitones: f32,
}

impl VocalRange {
    /// Lowest/highest pitch values to a range summary.
    pub fn from_pitch(pitch: &PitchAnalysis) -> Self {
        let mut sorted = pitch.values_hz.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let comfortable = FrequencyRange::new(
            stats::percentile(&sorted, 0.25),
            stats::percentile(&sorted, 0.75),
        );

        let span_semitones = if pitch.min_hz > 0.0 {
            12.0 * (pitch.max_hz / pitch.min_hz).log2()
        } else {
            0.0
        };

        Self {
            lowest_hz: pitch.min_hz,
            highest_hz: pitch.max_hz,
            comfortable,
            span_semitones,
        }
    }

    pub fn lowest_note(&self) -> Option<Note> {
        Note::from_frequency(self.lowest_hz).ok()
    }

    pub fn highest_note(&self) -> Option<Note> {
        Note::from_frequency(self.highest_hz).ok()
    }
}

/// One scored candidate from the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredType {
    pub voice_type: VoiceType,
    pub confidence: f32,
}

/// Take-level measurements reported alongside the classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub duration_secs: f32,
    pub sample_rate: u32,
    pub average_amplitude: f32,
    pub dynamic_range_db: f32,
}

impl AnalysisMetadata {
    pub fn from_buffer(buffer: &SampleBuffer) -> Self {
        let samples = buffer.samples();
        let average_amplitude =
            samples.iter().map(|s| s.abs()).sum::<f32>() / samples.len() as f32;

        // Robust dynamic range: p95 - p5 of framed RMS in dB, so a breath
        // pause does not read as an enormous range
        let mut frame_db = Vec::new();
        let mut start = 0;
        while start + METADATA_FRAME_SIZE <= samples.len() {
            let rms = stats::rms(&samples[start..start + METADATA_FRAME_SIZE]);
            frame_db.push(stats::amplitude_to_db(rms));
            start += METADATA_HOP_SIZE;
        }
        frame_db.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let dynamic_range_db = if frame_db.len() >= 2 {
            stats::percentile(&frame_db, 0.95) - stats::percentile(&frame_db, 0.05)
        } else {
            0.0
        };

        Self {
            duration_secs: buffer.duration_secs(),
            sample_rate: buffer.sample_rate(),
            average_amplitude,
            dynamic_range_db,
        }
    }
}

/// Full classification of one take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceClassificationResult {
    pub primary_type: VoiceType,
    pub confidence: f32,
    /// Remaining candidates that still scored above the configured
    /// threshold, in descending score order.
    pub alternatives: Vec<ScoredType>,
    pub vocal_range: VocalRange,
    pub average_fundamental_hz: f32,
    pub formants: FormantAnalysis,
    pub timbre: TimbreProfile,
    pub metadata: AnalysisMetadata,
    pub recommendations: Vec<String>,
}

/// Score every catalogue profile and rank descending.
///
/// Pure function of its inputs: identical measurements always produce the
/// identical ranking. The sort is stable, so equal scores fall back to
/// catalogue (enumeration) order.
pub fn rank_profiles(
    average_hz: f32,
    observed: &FrequencyRange,
    timbre: &TimbreProfile,
    formants: &FormantAnalysis,
    profiles: &[VoiceTypeProfile],
) -> Vec<ScoredType> {
    let mut scored: Vec<ScoredType> = profiles
        .iter()
        .map(|profile| ScoredType {
            voice_type: profile.voice_type,
            confidence: profile_score(average_hz, observed, timbre, formants, profile),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

fn profile_score(
    average_hz: f32,
    observed: &FrequencyRange,
    timbre: &TimbreProfile,
    formants: &FormantAnalysis,
    profile: &VoiceTypeProfile,
) -> f32 {
    let pitch = pitch_score(average_hz, profile).clamp(0.0, 1.0);
    let range = range_score(observed, &profile.fundamental).clamp(0.0, 1.0);
    let timbre = timbre_score(timbre, profile).clamp(0.0, 1.0);
    let formant = formant_score(formants, profile).clamp(0.0, 1.0);

    WEIGHT_PITCH * pitch + WEIGHT_RANGE * range + WEIGHT_TIMBRE * timbre + WEIGHT_FORMANT * formant
}

/// 1.0 inside the optimal range; inside the fundamental range the score
/// decays linearly from the optimal-range center to zero at the
/// fundamental-range edge on the deviation side; zero outside.
fn pitch_score(average_hz: f32, profile: &VoiceTypeProfile) -> f32 {
    if profile.optimal.contains(average_hz) {
        return 1.0;
    }
    if !profile.fundamental.contains(average_hz) {
        return 0.0;
    }

    let center = profile.optimal.center();
    let edge = if average_hz < center {
        profile.fundamental.min_hz
    } else {
        profile.fundamental.max_hz
    };
    let max_deviation = (edge - center).abs();
    if max_deviation < f32::EPSILON {
        return 0.0;
    }

    1.0 - (average_hz - center).abs() / max_deviation
}

/// Overlap length divided by the larger of the two interval lengths.
/// Symmetric in its arguments; 0 for disjoint intervals.
fn range_score(observed: &FrequencyRange, fundamental: &FrequencyRange) -> f32 {
    let overlap = observed.overlap_length(fundamental);
    let larger = observed.span().max(fundamental.span());
    if larger < f32::EPSILON {
        return 0.0;
    }
    overlap / larger
}

/// Mean closeness over the three timbre characteristics the profiles share
/// with the observed profile.
fn timbre_score(timbre: &TimbreProfile, profile: &VoiceTypeProfile) -> f32 {
    let pairs = [
        (timbre.brightness, profile.timbre.brightness),
        (timbre.warmth, profile.timbre.warmth),
        (timbre.resonance, profile.timbre.resonance),
    ];
    pairs
        .iter()
        .map(|(observed, target)| 1.0 - (observed - target).abs())
        .sum::<f32>()
        / pairs.len() as f32
}

/// Mean over F1 and F2 of a per-formant proximity score: 1.0 inside the
/// target band, otherwise falling off with distance measured in band spans.
fn formant_score(formants: &FormantAnalysis, profile: &VoiceTypeProfile) -> f32 {
    let f1 = single_formant_score(formants.f1_hz, &profile.f1_range);
    let f2 = single_formant_score(formants.f2_hz, &profile.f2_range);
    (f1 + f2) / 2.0
}

fn single_formant_score(hz: f32, target: &FrequencyRange) -> f32 {
    if target.contains(hz) {
        return 1.0;
    }
    let span = target.span();
    if span < f32::EPSILON {
        return 0.0;
    }
    let distance = if hz < target.min_hz {
        target.min_hz - hz
    } else {
        hz - target.max_hz
    };
    (1.0 - distance / span).max(0.0)
}

/// Rank the catalogue and assemble the full classification result.
pub fn classify(
    pitch: &PitchAnalysis,
    formants: &FormantAnalysis,
    timbre: &TimbreProfile,
    vibrato: &VibratoAnalysis,
    buffer: &SampleBuffer,
    profiles: &[VoiceTypeProfile],
    config: &AnalysisConfig,
) -> VoiceClassificationResult {
    let vocal_range = VocalRange::from_pitch(pitch);
    let observed = FrequencyRange::new(vocal_range.lowest_hz, vocal_range.highest_hz);

    let ranked = rank_profiles(pitch.average_hz, &observed, timbre, formants, profiles);
    let primary = ranked[0];
    let alternatives: Vec<ScoredType> = ranked[1..]
        .iter()
        .filter(|s| s.confidence > config.alternative_threshold)
        .copied()
        .collect();

    debug!(
        "classified {} at {:.2} confidence, {} alternatives",
        primary.voice_type,
        primary.confidence,
        alternatives.len()
    );

    let recommendations =
        build_recommendations(primary.voice_type, timbre, &vocal_range, vibrato, profiles);

    VoiceClassificationResult {
        primary_type: primary.voice_type,
        confidence: primary.confidence,
        alternatives,
        vocal_range,
        average_fundamental_hz: pitch.average_hz,
        formants: formants.clone(),
        timbre: *timbre,
        metadata: AnalysisMetadata::from_buffer(buffer),
        recommendations,
    }
}

/// Deterministic coaching templates keyed by the primary type, the measured
/// timbre against its targets, and the vibrato character.
fn build_recommendations(
    primary: VoiceType,
    timbre: &TimbreProfile,
    vocal_range: &VocalRange,
    vibrato: &VibratoAnalysis,
    profiles: &[VoiceTypeProfile],
) -> Vec<String> {
    let mut out = Vec::new();

    let base = match primary {
        VoiceType::Soprano => "Keep the top light: descending slides from head voice protect the upper passaggio.",
        VoiceType::MezzoSoprano => "Balance chest and head registers with medium-range messa di voce work.",
        VoiceType::Alto => "Anchor the low-middle range with open-vowel sustains before extending upward.",
        VoiceType::Tenor => "Approach the upper passaggio with narrow vowels to avoid spreading.",
        VoiceType::Baritone => "Develop the upper third of the range gradually; avoid pushing chest voice past D4.",
        VoiceType::Bass => "Keep low notes resonant rather than pressed; humming descents build depth without strain.",
    };
    out.push(base.to_string());

    if let (Some(low), Some(high)) = (vocal_range.lowest_note(), vocal_range.highest_note()) {
        out.push(format!(
            "Current working range {}\u{2013}{} ({:.1} semitones); extend in half-step increments only.",
            low, high, vocal_range.span_semitones
        ));
    }

    if let Some(profile) = profiles.iter().find(|p| p.voice_type == primary) {
        if timbre.brightness + 0.2 < profile.timbre.brightness {
            out.push(
                "Tone is darker than typical for this voice type: forward-placement exercises (ng, vv) will add ring.".to_string(),
            );
        }
        if timbre.resonance + 0.2 < profile.timbre.resonance {
            out.push(
                "Resonance is underdeveloped: semi-occluded straw phonation improves vocal tract tuning.".to_string(),
            );
        }
    }
    if timbre.clarity < 0.5 {
        out.push(
            "Harmonic clarity is low: gentle onset drills reduce noise in the tone.".to_string(),
        );
    }

    match vibrato.kind {
        VibratoKind::Tremolo => out.push(
            "Vibrato is faster than the natural range: release laryngeal tension with sighing glides.".to_string(),
        ),
        VibratoKind::Wobble => out.push(
            "Vibrato is slower than the natural range: steadier breath pressure will even it out.".to_string(),
        ),
        VibratoKind::Natural | VibratoKind::None => {}
    }

    out
}
