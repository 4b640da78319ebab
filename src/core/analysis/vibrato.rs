//! Vibrato analysis over the voiced pitch contour

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::core::analysis::pitch::PitchAnalysis;
use crate::core::dsp::stats;

/// Contour points needed before modulation measurement is attempted.
const MIN_CONTOUR_POINTS: usize = 10;
/// Mean-crossing alternations needed to call the modulation periodic.
const MIN_ALTERNATIONS: usize = 4;
/// Modulations narrower than this read as a held note, not vibrato.
const MIN_EXTENT_CENTS: f32 = 20.0;
/// Trained-vibrato rate band in Hz; slower is wobble, faster is tremolo.
const NATURAL_RATE_HZ: (f32, f32) = (4.5, 7.5);

/// Character of the periodic pitch modulation, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VibratoKind {
    None,
    Natural,
    Tremolo,
    Wobble,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibratoAnalysis {
    pub detected: bool,
    pub kind: VibratoKind,
    /// Modulation rate in Hz; 0.0 when no periodic modulation was found.
    pub rate_hz: f32,
    /// Peak-to-peak modulation width in cents.
    pub extent_cents: f32,
    /// `1/(1+cv)` of the half-period lengths; 1.0 is metronomic.
    pub regularity: f32,
}

impl VibratoAnalysis {
    fn none() -> Self {
        Self {
            detected: false,
            kind: VibratoKind::None,
            rate_hz: 0.0,
            extent_cents: 0.0,
            regularity: 0.0,
        }
    }
}

/// Measure periodic pitch modulation on the voiced contour of a take.
///
/// Contour points are treated as uniformly spaced one pitch hop apart,
/// which is exact for the sustained-vowel takes vibrato is judged on.
pub fn analyze_vibrato(
    pitch: &PitchAnalysis,
    sample_rate: u32,
    config: &AnalysisConfig,
) -> VibratoAnalysis {
    let contour = &pitch.values_hz;
    if contour.len() < MIN_CONTOUR_POINTS || pitch.average_hz <= 0.0 {
        return VibratoAnalysis::none();
    }

    let hop_secs = config.pitch_hop_size as f32 / sample_rate as f32;

    // Deviation from the mean in cents
    let cents: Vec<f32> = contour
        .iter()
        .map(|&hz| 1200.0 * (hz / pitch.average_hz).log2())
        .collect();

    // Indices where the deviation crosses zero with a strict sign change
    let mut crossings = Vec::new();
    for i in 1..cents.len() {
        if (cents[i - 1] < 0.0 && cents[i] > 0.0) || (cents[i - 1] > 0.0 && cents[i] < 0.0) {
            crossings.push(i);
        }
    }
    if crossings.len() < MIN_ALTERNATIONS {
        return VibratoAnalysis::none();
    }

    // Half periods between consecutive crossings, in contour steps
    let half_periods: Vec<f32> = crossings
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f32)
        .collect();
    let mean_half = half_periods.iter().sum::<f32>() / half_periods.len() as f32;
    if mean_half <= 0.0 {
        return VibratoAnalysis::none();
    }

    let rate_hz = 1.0 / (2.0 * mean_half * hop_secs);

    // Peak-to-peak extent via robust percentiles of the cents contour
    let mut sorted_cents = cents.clone();
    sorted_cents.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let extent_cents =
        stats::percentile(&sorted_cents, 0.95) - stats::percentile(&sorted_cents, 0.05);

    let hp_mean = mean_half;
    let hp_sigma = {
        let var = half_periods
            .iter()
            .map(|&h| (h - hp_mean) * (h - hp_mean))
            .sum::<f32>()
            / half_periods.len() as f32;
        var.sqrt()
    };
    let regularity = 1.0 / (1.0 + hp_sigma / hp_mean);

    if extent_cents < MIN_EXTENT_CENTS {
        return VibratoAnalysis::none();
    }

    let kind = if rate_hz > NATURAL_RATE_HZ.1 {
        VibratoKind::Tremolo
    } else if rate_hz < NATURAL_RATE_HZ.0 {
        VibratoKind::Wobble
    } else {
        VibratoKind::Natural
    };

    VibratoAnalysis {
        detected: true,
        kind,
        rate_hz,
        extent_cents,
        regularity,
    }
}
