//! Vocal-health indicators and their signal-derived sub-terms
//!
//! Each indicator is a fixed weighted blend of timbre features and
//! measurements taken directly from the sample buffer. Every sub-term is
//! deterministic: identical input always produces identical indicators.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::core::analysis::{AutocorrelationPitchEstimator, PitchEstimator, TimbreAnalysis};
use crate::core::buffer::SampleBuffer;
use crate::core::dsp::{stats, FftProcessor};

/// Transform length for the averaged spectrum the spectral sub-terms share.
const SPECTRUM_FFT_SIZE: usize = 2048;
/// Frame geometry for the voice-break scan.
const BREAK_FRAME_SIZE: usize = 1024;
const BREAK_HOP_SIZE: usize = 512;
/// A frame must carry at least this RMS before a drop can count as a break,
/// and before it contributes to the HNR estimate.
const VOICED_RMS_FLOOR: f32 = 0.01;
/// An energy drop to below this fraction of the previous frame is a break.
const BREAK_DROP_RATIO: f32 = 0.1;
/// Amplitude-modulation band read as tremor, in Hz.
const TREMOR_BAND_HZ: (f32, f32) = (4.0, 12.0);
/// Envelope frames needed before a tremor estimate is attempted.
const TREMOR_MIN_FRAMES: usize = 10;
/// Period band searched for the harmonic peak, in Hz.
const HNR_PERIOD_BAND_HZ: (f32, f32) = (50.0, 500.0);
/// Spectral-tilt regression band, in Hz.
const TILT_BAND_HZ: (f32, f32) = (100.0, 8000.0);
/// Tilt slopes are normalized against this fall-off in dB per octave.
const TILT_FULL_SCALE_DB_PER_OCTAVE: f32 = 12.0;

/// The eight health indicators, each in [0,1]. Higher is worse except for
/// `pitch_stability` and `resonance_quality`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VocalHealthIndicators {
    pub strain: f32,
    pub fatigue: f32,
    pub hoarseness: f32,
    pub breathiness: f32,
    pub tremor: f32,
    pub voice_breaks: f32,
    pub pitch_stability: f32,
    pub resonance_quality: f32,
}

impl VocalHealthIndicators {
    /// True when every indicator sits in the unit interval.
    pub fn in_bounds(&self) -> bool {
        [
            self.strain,
            self.fatigue,
            self.hoarseness,
            self.breathiness,
            self.tremor,
            self.voice_breaks,
            self.pitch_stability,
            self.resonance_quality,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
    }
}

/// Signal measurements shared between indicators, computed once per call.
struct SignalFeatures {
    spectral_irregularity: f32,
    high_freq_emphasis: f32,
    pitch_flexibility: f32,
    amplitude_stability: f32,
    spectral_tilt: f32,
    hnr: f32,
    tremor: f32,
    voice_breaks: f32,
}

/// Derive the eight indicators from the collaborator-supplied timbre and
/// measurements on the raw buffer.
pub fn compute_indicators(
    timbre: &TimbreAnalysis,
    buffer: &SampleBuffer,
    config: &AnalysisConfig,
) -> VocalHealthIndicators {
    let t = timbre.clamped();
    let sig = signal_features(buffer, config);

    let strain =
        0.4 * t.roughness + 0.3 * sig.spectral_irregularity + 0.3 * sig.high_freq_emphasis;
    let fatigue = 0.3 * (1.0 - t.brightness)
        + 0.3 * (1.0 - sig.pitch_flexibility)
        + 0.2 * (1.0 - t.resonance)
        + 0.2 * (1.0 - sig.amplitude_stability);
    let hoarseness = 0.6 * t.roughness + 0.4 * t.inharmonicity;
    let breathiness = 0.4 * sig.spectral_tilt + 0.6 * (1.0 - sig.hnr);
    let resonance_quality =
        0.5 * t.resonance + 0.3 * (1.0 - t.inharmonicity) + 0.2 * t.spectral_balance;

    VocalHealthIndicators {
        strain: strain.clamp(0.0, 1.0),
        fatigue: fatigue.clamp(0.0, 1.0),
        hoarseness: hoarseness.clamp(0.0, 1.0),
        breathiness: breathiness.clamp(0.0, 1.0),
        tremor: sig.tremor.clamp(0.0, 1.0),
        voice_breaks: sig.voice_breaks.clamp(0.0, 1.0),
        pitch_stability: t.pitch_stability,
        resonance_quality: resonance_quality.clamp(0.0, 1.0),
    }
}

fn signal_features(buffer: &SampleBuffer, config: &AnalysisConfig) -> SignalFeatures {
    let samples = buffer.samples();
    let sample_rate = buffer.sample_rate();

    let mut fft = FftProcessor::new(SPECTRUM_FFT_SIZE);
    let spectrum = fft.average_spectrum(samples, config.pitch_hop_size);

    let envelope = frame_rms_envelope(samples, config.pitch_frame_size, config.pitch_hop_size);

    let features = SignalFeatures {
        spectral_irregularity: stats::spectral_flatness(&spectrum),
        high_freq_emphasis: high_freq_emphasis(&spectrum, sample_rate),
        pitch_flexibility: pitch_flexibility(buffer, config),
        amplitude_stability: amplitude_stability(&envelope),
        spectral_tilt: spectral_tilt(&spectrum, sample_rate),
        hnr: harmonic_to_noise(samples, sample_rate, config),
        tremor: tremor_strength(&envelope, sample_rate, config.pitch_hop_size),
        voice_breaks: voice_break_fraction(samples),
    };
    debug!(
        "signal features: irregularity {:.3}, hf {:.3}, flexibility {:.3}, tilt {:.3}, hnr {:.3}",
        features.spectral_irregularity,
        features.high_freq_emphasis,
        features.pitch_flexibility,
        features.spectral_tilt,
        features.hnr
    );
    features
}

fn frame_rms_envelope(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<f32> {
    let mut envelope = Vec::new();
    let mut start = 0;
    while start + frame_size <= samples.len() {
        envelope.push(stats::rms(&samples[start..start + frame_size]));
        start += hop_size;
    }
    envelope
}

/// Share of averaged-spectrum energy above 4 kHz.
fn high_freq_emphasis(spectrum: &[f32], sample_rate: u32) -> f32 {
    let total: f32 = spectrum.iter().map(|m| m * m).sum();
    if total < 1e-10 {
        return 0.0;
    }
    let bin_hz = sample_rate as f32 / SPECTRUM_FFT_SIZE as f32;
    let high: f32 = spectrum
        .iter()
        .enumerate()
        .filter(|(bin, _)| *bin as f32 * bin_hz >= 4000.0)
        .map(|(_, m)| m * m)
        .sum();
    high / total
}

/// Semitone span actually reached by the autocorrelation pitch track,
/// normalized by one octave. A held single pitch scores 0.
fn pitch_flexibility(buffer: &SampleBuffer, config: &AnalysisConfig) -> f32 {
    let samples = buffer.samples();
    let mut estimator = AutocorrelationPitchEstimator::new(config.pitch_search_band);

    let mut low = f32::MAX;
    let mut high = 0.0f32;
    let mut voiced = 0usize;
    let mut start = 0;
    while start + config.pitch_frame_size <= samples.len() {
        let hz = estimator.estimate(
            &samples[start..start + config.pitch_frame_size],
            buffer.sample_rate(),
        );
        if hz > 0.0 {
            low = low.min(hz);
            high = high.max(hz);
            voiced += 1;
        }
        start += config.pitch_hop_size;
    }

    if voiced < 2 || low <= 0.0 {
        return 0.0;
    }
    let semitones = 12.0 * (high / low).log2();
    (semitones / 12.0).clamp(0.0, 1.0)
}

/// `1/(1+cv)` of the frame RMS envelope; 1.0 for perfectly steady loudness.
fn amplitude_stability(envelope: &[f32]) -> f32 {
    let mean = stats::mean(envelope);
    if mean < 1e-10 {
        return 0.0;
    }
    let sigma = stats::std_dev(envelope);
    1.0 / (1.0 + sigma / mean)
}

/// Negated dB-per-octave regression slope over the voice band, normalized
/// by a 12 dB/octave fall-off. A rising spectrum reads as zero tilt.
fn spectral_tilt(spectrum: &[f32], sample_rate: u32) -> f32 {
    let bin_hz = sample_rate as f32 / SPECTRUM_FFT_SIZE as f32;

    let points: Vec<(f32, f32)> = spectrum
        .iter()
        .enumerate()
        .filter_map(|(bin, &mag)| {
            let hz = bin as f32 * bin_hz;
            if hz >= TILT_BAND_HZ.0 && hz <= TILT_BAND_HZ.1 && mag > 1e-10 {
                Some((hz.log2(), stats::amplitude_to_db(mag)))
            } else {
                None
            }
        })
        .collect();

    let slope = stats::linear_slope(&points);
    (-slope / TILT_FULL_SCALE_DB_PER_OCTAVE).clamp(0.0, 1.0)
}

/// Mean peak normalized autocorrelation in the voice period band over
/// voiced frames; near 1.0 for a clean periodic tone, low for noise.
fn harmonic_to_noise(samples: &[f32], sample_rate: u32, config: &AnalysisConfig) -> f32 {
    let min_lag = (sample_rate as f32 / HNR_PERIOD_BAND_HZ.1) as usize;
    let max_lag = (sample_rate as f32 / HNR_PERIOD_BAND_HZ.0) as usize;

    let mut peaks = Vec::new();
    let mut start = 0;
    while start + config.pitch_frame_size <= samples.len() {
        let frame = &samples[start..start + config.pitch_frame_size];
        start += config.pitch_hop_size;

        if stats::rms(frame) <= VOICED_RMS_FLOOR || max_lag >= frame.len() {
            continue;
        }
        let corr = stats::autocorrelation(frame, max_lag);
        let peak = corr[min_lag..]
            .iter()
            .cloned()
            .fold(0.0f32, f32::max)
            .clamp(0.0, 1.0);
        peaks.push(peak);
    }

    if peaks.is_empty() {
        return 0.0;
    }
    stats::mean(&peaks)
}

/// Depth of 4-12 Hz modulation on the RMS envelope: the amplitude of the
/// band-limited modulation divided by the mean envelope level, measured by
/// direct projection of the tremor-band bins. A perfectly steady tone has
/// no modulation and scores zero; a full-depth wobble approaches one.
fn tremor_strength(envelope: &[f32], sample_rate: u32, hop_size: usize) -> f32 {
    if envelope.len() < TREMOR_MIN_FRAMES {
        return 0.0;
    }

    let mean = stats::mean(envelope);
    if mean < 1e-10 {
        return 0.0;
    }
    let detrended: Vec<f32> = envelope.iter().map(|&e| e - mean).collect();

    let envelope_rate = sample_rate as f32 / hop_size as f32;
    let n = detrended.len();
    let bin_hz = envelope_rate / n as f32;

    // Projecting only the tremor-band bins keeps this O(n · band-width)
    let mut band_power = 0.0f32;
    for bin in 1..n / 2 {
        let hz = bin as f32 * bin_hz;
        if hz < TREMOR_BAND_HZ.0 || hz > TREMOR_BAND_HZ.1 {
            continue;
        }
        let (mut re, mut im) = (0.0f32, 0.0f32);
        let step = 2.0 * std::f32::consts::PI * bin as f32 / n as f32;
        for (i, &e) in detrended.iter().enumerate() {
            let phase = step * i as f32;
            re += e * phase.cos();
            im += e * phase.sin();
        }
        band_power += re * re + im * im;
    }

    // A bin magnitude of A·n/2 corresponds to a sinusoid of amplitude A,
    // so the band-limited modulation amplitude is 2·√power / n
    let band_amplitude = 2.0 * band_power.sqrt() / n as f32;
    (band_amplitude / mean).clamp(0.0, 1.0)
}

/// Fraction of consecutive-frame transitions where energy collapses by
/// more than 90% from an audible level.
fn voice_break_fraction(samples: &[f32]) -> f32 {
    let envelope = frame_rms_envelope(samples, BREAK_FRAME_SIZE, BREAK_HOP_SIZE);
    if envelope.len() < 2 {
        return 0.0;
    }

    let breaks = envelope
        .windows(2)
        .filter(|pair| pair[0] > VOICED_RMS_FLOOR && pair[1] < pair[0] * BREAK_DROP_RATIO)
        .count();

    breaks as f32 / (envelope.len() - 1) as f32
}
